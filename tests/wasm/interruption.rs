use std::time::Duration ;
use cmd_link::{ CancelReason, CancellationToken, CommandDeclaration, DispatchContext, DispatchError, EpochTicker, execute, link };
use crate::fixture_tree::{ argv, ignite_tree };
use crate::wasm_fixtures::{ ECHO, MOODY, SPIN, interruptible_engine, wasm_plugin };

const TICK: Duration = Duration::from_millis( 5 );

#[test]
fn deadline_stops_a_spinning_guest() {

	let engine = interruptible_engine();
	let _ticker = EpochTicker::start( &engine, TICK );
	let mut root = ignite_tree();
	link( &mut root, &wasm_plugin( &engine, "spin", SPIN ), [ CommandDeclaration::new( "spin" )]).expect( "link failed" );

	let ctx = DispatchContext::new().with_timeout( Duration::from_millis( 50 ));

	match execute( &root, &argv( &[ "spin" ]), &ctx ) {
		Err( DispatchError::Cancelled { plugin, reason: CancelReason::DeadlineExceeded }) => assert_eq!( plugin.as_str(), "spin" ),
		value => panic!( "Expected DeadlineExceeded, found: {:#?}", value ),
	}

}

#[test]
fn cancellation_stops_a_spinning_guest() {

	let engine = interruptible_engine();
	let _ticker = EpochTicker::start( &engine, TICK );
	let mut root = ignite_tree();
	link( &mut root, &wasm_plugin( &engine, "spin", SPIN ), [ CommandDeclaration::new( "spin" )]).expect( "link failed" );

	let token = CancellationToken::new();
	let ctx = DispatchContext::new().with_token( token.clone() );
	let canceller = std::thread::spawn( move || {
		std::thread::sleep( Duration::from_millis( 50 ));
		token.cancel();
	});

	let result = execute( &root, &argv( &[ "spin" ]), &ctx );
	let _ = canceller.join();

	match result {
		Err( DispatchError::Cancelled { reason: CancelReason::Cancelled, .. }) => {}
		value => panic!( "Expected Cancelled, found: {:#?}", value ),
	}

}

#[test]
fn quick_calls_finish_under_epoch_interruption() {

	let engine = interruptible_engine();
	let _ticker = EpochTicker::start( &engine, TICK );
	let mut root = ignite_tree();
	link( &mut root, &wasm_plugin( &engine, "echo", ECHO ), [ CommandDeclaration::new( "echo" )]).expect( "link failed" );

	let ctx = DispatchContext::new().with_timeout( Duration::from_secs( 30 ));
	execute( &root, &argv( &[ "echo" ]), &ctx ).expect( "dispatch failed" );

}

#[test]
fn plugin_serves_calls_after_a_timeout() {

	let engine = interruptible_engine();
	let _ticker = EpochTicker::start( &engine, TICK );
	let mut root = ignite_tree();
	link( &mut root, &wasm_plugin( &engine, "moody", MOODY ), [ CommandDeclaration::new( "moody" )]).expect( "link failed" );

	let ctx = DispatchContext::new().with_timeout( Duration::from_millis( 30 ));
	match execute( &root, &argv( &[ "moody", "spin" ]), &ctx ) {
		Err( DispatchError::Cancelled { reason: CancelReason::DeadlineExceeded, .. }) => {}
		value => panic!( "Expected DeadlineExceeded, found: {:#?}", value ),
	}

	execute( &root, &argv( &[ "moody" ]), &DispatchContext::new() ).expect( "dispatch after timeout failed" );

}

#[test]
fn plugin_serves_calls_after_a_cancellation() {

	let engine = interruptible_engine();
	let _ticker = EpochTicker::start( &engine, TICK );
	let mut root = ignite_tree();
	link( &mut root, &wasm_plugin( &engine, "moody", MOODY ), [ CommandDeclaration::new( "moody" )]).expect( "link failed" );

	let token = CancellationToken::new();
	let ctx = DispatchContext::new().with_token( token.clone() );
	let canceller = std::thread::spawn( move || {
		std::thread::sleep( Duration::from_millis( 30 ));
		token.cancel();
	});
	let first = execute( &root, &argv( &[ "moody", "spin" ]), &ctx );
	let _ = canceller.join();
	match first {
		Err( DispatchError::Cancelled { reason: CancelReason::Cancelled, .. }) => {}
		value => panic!( "Expected Cancelled, found: {:#?}", value ),
	}

	for _ in 0..2 {
		execute( &root, &argv( &[ "moody" ]), &DispatchContext::new() ).expect( "dispatch after cancellation failed" );
	}

}
