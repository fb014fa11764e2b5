use cmd_link::{ CommandDeclaration, LinkError, LinkPolicy, LinkSession, PluginCommand, PluginId };
use crate::fixture_tree::{ ignite_tree, silent_plugin };

fn plugins() -> Vec<( std::sync::Arc<cmd_link::Plugin>, Vec<PluginCommand> )> {
	vec![
		( silent_plugin( "alpha" ), vec![ CommandDeclaration::new( "alpha" ).into() ]),
		( silent_plugin( "broken" ), vec![
			CommandDeclaration::new( "fine" ).into(),
			CommandDeclaration::new( "lost" ).place_under( "nowhere" ),
			CommandDeclaration::new( "never" ).into(),
		]),
		( silent_plugin( "gamma" ), vec![ CommandDeclaration::new( "gamma" ).place_under( "scaffold" )]),
	]
}

#[test]
fn default_policy_aborts_the_session() {

	let mut root = ignite_tree();
	let session = LinkSession::new();
	assert_eq!( session.policy(), LinkPolicy::AbortSession );

	let report = session.link_all( &mut root, plugins() );

	assert!( !report.is_success() );
	assert_eq!( report.linked(), [ PluginId::new( "alpha" )]);
	assert_eq!( report.failures().len(), 1 );
	assert_eq!( report.failures()[0].0, PluginId::new( "broken" ));
	assert_eq!( report.skipped(), [ PluginId::new( "gamma" )]);
	assert_eq!( report.first_error(), Some( &LinkError::PlacementNotFound {
		command: "lost".into(),
		hint: "nowhere".into(),
	}));

	assert!( root.child( "alpha" ).is_some() );
	assert!( root.child( "fine" ).is_some() );
	assert!( root.child( "never" ).is_none() );
	assert!( root.child( "scaffold" ).and_then(| scaffold | scaffold.child( "gamma" )).is_none() );

}

#[test]
fn continue_policy_only_stops_the_failing_plugin() {

	let mut root = ignite_tree();
	let session = LinkSession::new().with_policy( LinkPolicy::ContinueWithOtherPlugins );

	let report = session.link_all( &mut root, plugins() );

	assert_eq!( report.linked(), [ PluginId::new( "alpha" ), PluginId::new( "gamma" )]);
	assert_eq!( report.failures().len(), 1 );
	assert!( report.skipped().is_empty() );

	assert!( root.child( "never" ).is_none() );
	assert!( root.child( "scaffold" ).and_then(| scaffold | scaffold.child( "gamma" )).is_some() );

}

#[test]
fn later_plugins_see_earlier_plugins_commands() {

	let mut root = ignite_tree();
	let session = LinkSession::new().with_policy( LinkPolicy::ContinueWithOtherPlugins );

	let report = session.link_all( &mut root, vec![
		( silent_plugin( "first" ), vec![ CommandDeclaration::new( "tools" ).with_command( CommandDeclaration::new( "fmt" )).into() ]),
		( silent_plugin( "second" ), vec![ CommandDeclaration::new( "lint" ).place_under( "ignite tools" )]),
		( silent_plugin( "third" ), vec![ CommandDeclaration::new( "fmt" ).place_under( "tools" )]),
	]);

	assert_eq!( report.linked(), [ PluginId::new( "first" ), PluginId::new( "second" )]);
	assert_eq!( report.first_error(), Some( &LinkError::NameConflict {
		command: "fmt".into(),
		target: "ignite tools".into(),
	}));
	assert_eq!( root.to_string(), "\
ignite
  scaffold
    chain* --path=string
  tools
    fmt*
    lint*
" );

}

#[test]
fn successful_session_collapses_to_ok() {

	let mut root = ignite_tree();

	let report = LinkSession::new().link_all( &mut root, vec![
		( silent_plugin( "one" ), vec![ CommandDeclaration::new( "one" )]),
		( silent_plugin( "two" ), vec![ CommandDeclaration::new( "two" )]),
	]);

	assert!( report.is_success() );
	assert!( report.clone().into_result().is_ok() );
	assert_eq!( report.linked().len(), 2 );

}

#[test]
fn link_plugin_reports_first_error() {

	let mut root = ignite_tree();
	let plugin = silent_plugin( "foo" );

	let result = LinkSession::new().link_plugin( &mut root, &plugin, [
		CommandDeclaration::new( "scaffold" ),
		CommandDeclaration::new( "other" ),
	]);

	assert!( matches!( result, Err( LinkError::NameConflict { .. })));
	assert!( root.child( "other" ).is_none() );

}
