use cmd_link::{ CommandDeclaration, CommandNode, LinkError, ResolveError, link, resolve_placement };
use crate::fixture_tree::{ ignite_tree, silent_plugin };

#[test]
fn link_without_hint_attaches_at_root() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	link( &mut root, &plugin, [ CommandDeclaration::new( "foo" )]).expect( "link failed" );

	assert_eq!( root.to_string(), "\
ignite
  scaffold
    chain* --path=string
  foo*
" );

}

#[test]
fn link_under_absolute_hint() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "ignite scaffold" )])
		.expect( "link failed" );

	assert_eq!( root.to_string(), "\
ignite
  scaffold
    chain* --path=string
    foo*
" );

}

#[test]
fn link_under_hint_without_root_name() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "scaffold" )])
		.expect( "link failed" );

	let scaffold = root.child( "scaffold" ).expect( "scaffold missing" );
	let names = scaffold.children().iter().map( CommandNode::name ).collect::<Vec<_>>();
	assert_eq!( names, [ "chain", "foo" ]);

}

#[test]
fn blank_hint_resolves_to_root() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "   " )]).expect( "link failed" );
	assert!( root.child( "foo" ).is_some() );

	let placement = resolve_placement( &mut root, "ignite" ).expect( "root should resolve" );
	assert_eq!( placement.path, "ignite" );
	assert_eq!( placement.node.name(), "ignite" );

}

#[test]
fn link_under_runnable_command_fails() {

	let mut root = ignite_tree();
	let before = root.to_string();
	let plugin = silent_plugin( "foo" );

	match link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "ignite scaffold chain" )]) {
		Err( LinkError::InvalidPlacementTarget { command, target }) => {
			assert_eq!( command, "foo" );
			assert_eq!( target, "ignite scaffold chain" );
		}
		value => panic!( "Expected InvalidPlacementTarget error, found: {:#?}", value ),
	}
	assert_eq!( root.to_string(), before );

}

#[test]
fn runnable_target_error_message() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	let error = link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "scaffold chain" )])
		.expect_err( "linking under a runnable command should fail" );
	assert_eq!( error.to_string(), r#"can't attach plugin command "foo" to runnable command "ignite scaffold chain""# );

}

#[test]
fn link_under_unknown_command_fails() {

	let mut root = ignite_tree();
	let before = root.to_string();
	let plugin = silent_plugin( "foo" );

	let error = link( &mut root, &plugin, [ CommandDeclaration::new( "foo" ).place_under( "ignite unknown" )])
		.expect_err( "linking under a missing command should fail" );

	assert_eq!( error, LinkError::PlacementNotFound { command: "foo".into(), hint: "ignite unknown".into() });
	assert_eq!( error.to_string(), r#"unable to find command path "ignite unknown" for plugin command "foo""# );
	assert_eq!( root.to_string(), before );

}

#[test]
fn resolver_reports_hint_as_supplied() {

	let mut root = ignite_tree();

	match resolve_placement( &mut root, "scaffold  missing" ) {
		Err( ResolveError::NoSuchPath( hint )) => assert_eq!( hint, "scaffold  missing" ),
		value => panic!( "Expected NoSuchPath error, found: {:#?}", value ),
	}

}

#[test]
fn root_name_is_only_skipped_as_first_segment() {

	let mut root = ignite_tree();

	match resolve_placement( &mut root, "scaffold ignite" ) {
		Err( ResolveError::NoSuchPath( _ )) => {}
		value => panic!( "Expected NoSuchPath error, found: {:#?}", value ),
	}

}
