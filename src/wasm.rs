//! WebAssembly plugin handler.
//!
//! A [`WasmPlugin`] runs plugin commands inside a wasmtime component instance.
//! The component exports a single function, `execute` by default:
//!
//! ```wit
//! execute: func(
//! 	path: list<string>,
//! 	args: list<string>,
//! 	flags: list<tuple<string, string>>,
//! ) -> result<_, string>;
//! ```
//!
//! # Cancellation
//!
//! Every call installs an epoch deadline callback that checks the
//! [`DispatchContext`]. On an engine with
//! [`Config::epoch_interruption`]( wasmtime::Config::epoch_interruption ) enabled,
//! the guest traps at the first epoch tick after the context is cancelled or
//! its deadline passes. Something has to tick the engine; [`EpochTicker`] does
//! it from a background thread. Without epoch interruption the call always
//! runs to completion and the dispatcher discards its result if the context
//! was interrupted in the meantime.
//!
//! A trapped guest instance cannot be entered again, so an interrupted or
//! trapping call costs the plugin its instance and the next call instantiates
//! a replacement. Guest state does not survive such a call.

use std::sync::{ Arc, Mutex };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::thread::JoinHandle ;
use std::time::Duration ;
use thiserror::Error ;
use wasmtime::{ Engine, Store, UpdateDeadline };
use wasmtime::component::{ Component, Instance, InstancePre, Linker, Val };

use crate::dispatch::{ CancelReason, DispatchContext };
use crate::invocation::Invocation ;
use crate::plugin::{ HandlerError, PluginHandler };



#[derive( Debug, Error )]
#[error( "plugin call {0}" )]
struct Interrupted( CancelReason );

/// A plugin backed by a wasmtime component.
///
/// The live instance is guarded by a mutex, so concurrent invocations of the
/// same plugin run one after another. A call that traps or is interrupted
/// leaves its instance unusable; it is dropped and the next call runs on a
/// fresh one built from the pre-linked component and a new context.
///
/// # Type Parameters
/// - `Ctx`: User context stored inside the wasmtime `Store`, available to host imports
pub struct WasmPlugin<Ctx: 'static> {
	engine: Engine,
	pre: InstancePre<Ctx>,
	new_context: Box<dyn Fn() -> Ctx + Send + Sync>,
	instance: Mutex<Option<WasmInstance<Ctx>>>,
	export: String,
}

struct WasmInstance<Ctx: 'static> {
	store: Store<Ctx>,
	instance: Instance,
}

impl<Ctx: Send + 'static> WasmPlugin<Ctx> {

	/// Name of the export called when none is configured.
	pub const DEFAULT_EXPORT: &'static str = "execute" ;

	/// Links `component` against `linker` and instantiates it once.
	///
	/// `new_context` builds the store context, for the first instance and for
	/// every replacement after a failed call. Host functions the plugin imports
	/// must already be defined in `linker`.
	///
	/// # Errors
	/// Returns an error if linking or the first instantiation fails.
	pub fn instantiate<F>(
		engine: &Engine,
		linker: &Linker<Ctx>,
		component: &Component,
		new_context: F,
	) -> Result<Self, wasmtime::Error>
	where
		F: Fn() -> Ctx + Send + Sync + 'static,
	{
		let pre = linker.instantiate_pre( component )?;
		let first = fresh_instance( engine, &pre, &new_context )?;
		Ok( Self {
			engine: engine.clone(),
			pre,
			new_context: Box::new( new_context ),
			instance: Mutex::new( Some( first )),
			export: Self::DEFAULT_EXPORT.to_string(),
		})
	}

	/// Calls `export` instead of [`Self::DEFAULT_EXPORT`].
	pub fn with_export( mut self, export: impl Into<String> ) -> Self {
		self.export = export.into();
		self
	}

	#[inline] pub fn export( &self ) -> &str { &self.export }

	fn call( &self, current: &mut WasmInstance<Ctx>, invocation: &Invocation, ctx: &DispatchContext ) -> Result<Val, CallError> {

		let WasmInstance { store, instance } = current ;

		let watch = ctx.clone();
		store.epoch_deadline_callback( move | _ | match watch.interrupted() {
			Some( reason ) => Err( wasmtime::Error::new( Interrupted( reason ))),
			None => Ok( UpdateDeadline::Continue( 1 )),
		});
		store.set_epoch_deadline( 1 );

		let func = instance
			.get_export_index( &mut *store, None, &self.export )
			.and_then(| index | instance.get_func( &mut *store, index ))
			.ok_or_else(|| CallError::Usable( HandlerError::MissingExport( self.export.clone() )))?;

		let params = [
			string_list( invocation.path() ),
			string_list( invocation.args() ),
			Val::List( invocation.flags().iter()
				.map(|( name, value )| Val::Tuple( vec![ Val::String( name.clone() ), Val::String( value.clone() )]))
				.collect()
			),
		];
		let mut results = [ Val::Bool( false ) ];

		func.call( &mut *store, &params, &mut results ).map_err(| err | CallError::Broken( match ctx.interrupted() {
			Some( _ ) => HandlerError::Interrupted,
			None => HandlerError::Runtime( err.to_string() ),
		}))?;
		func.post_return( &mut *store ).map_err(| err | CallError::Broken( HandlerError::Runtime( err.to_string() )))?;

		let [ result ] = results ;
		Ok( result )

	}

}

/// Failure of a single call, split by whether the instance can be entered again.
enum CallError {
	Usable( HandlerError ),
	Broken( HandlerError ),
}

fn fresh_instance<Ctx: 'static>(
	engine: &Engine,
	pre: &InstancePre<Ctx>,
	new_context: &dyn Fn() -> Ctx,
) -> Result<WasmInstance<Ctx>, wasmtime::Error> {
	let mut store = Store::new( engine, new_context() );
	let instance = pre.instantiate( &mut store )?;
	Ok( WasmInstance { store, instance })
}

impl<Ctx: Send + 'static> PluginHandler for WasmPlugin<Ctx> {

	fn execute( &self, invocation: &Invocation, ctx: &DispatchContext ) -> Result<(), HandlerError> {

		let mut slot = self.instance.lock().map_err(|_| HandlerError::LockRejected )?;
		let mut current = match slot.take() {
			Some( current ) => current,
			None => fresh_instance( &self.engine, &self.pre, &self.new_context )
				.map_err(| err | HandlerError::Runtime( err.to_string() ))?,
		};

		let result = match self.call( &mut current, invocation, ctx ) {
			Ok( result ) => { *slot = Some( current ); result }
			Err( CallError::Usable( error )) => { *slot = Some( current ); return Err( error ) }
			Err( CallError::Broken( error )) => {
				tracing::debug!( export = %self.export, %error, "discarding wasm instance after failed call" );
				return Err( error )
			}
		};

		match result {
			Val::Result( Ok( _ )) => Ok(()),
			Val::Result( Err( Some( message ))) => Err( match *message {
				Val::String( message ) => HandlerError::Failed( message ),
				other => HandlerError::UnexpectedResponse( format!( "{:?}", other )),
			}),
			Val::Result( Err( None )) => Err( HandlerError::Failed( format!( "{} reported failure", self.export ))),
			other => Err( HandlerError::UnexpectedResponse( format!( "{:?}", other ))),
		}

	}

}

impl<Ctx: 'static> std::fmt::Debug for WasmPlugin<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "WasmPlugin" )
			.field( "export", &self.export )
			.finish_non_exhaustive()
	}
}

fn string_list( items: &[String] ) -> Val {
	Val::List( items.iter().cloned().map( Val::String ).collect() )
}

/// Increments an engine's epoch at a fixed interval until dropped.
///
/// Epoch-based interruption only fires when the epoch advances, so hosts that
/// want cancellation of running plugin calls keep one of these alive.
#[derive( Debug )]
pub struct EpochTicker {
	stop: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl EpochTicker {

	/// Starts ticking `engine` every `interval`.
	pub fn start( engine: &Engine, interval: Duration ) -> Self {
		let stop = Arc::new( AtomicBool::new( false ));
		let stop_flag = Arc::clone( &stop );
		let engine = engine.clone();
		let handle = std::thread::spawn( move || {
			while !stop_flag.load( Ordering::Acquire ) {
				std::thread::sleep( interval );
				engine.increment_epoch();
			}
		});
		Self { stop, handle: Some( handle )}
	}

}

impl Drop for EpochTicker {
	fn drop( &mut self ) {
		self.stop.store( true, Ordering::Release );
		if let Some( handle ) = self.handle.take() { let _ = handle.join(); }
	}
}
