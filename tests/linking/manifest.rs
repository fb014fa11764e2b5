use cmd_link::{ CommandNode, FlagKind, LinkSession, ManifestError, PluginManifest };
use crate::fixture_tree::{ ignite_tree, silent_plugin };

const MANIFEST: &str = r#"
id = "hello"

[[commands]]
name = "foo"
place-under = "ignite scaffold"
short = "Scaffold a foo"
usage = "[name]"

[commands.flags.path]
kind = "string"
default = "."
shorthand = "p"

[commands.flags.dry-run]
kind = "bool"

[[commands.commands]]
name = "bar"

[[commands.commands]]
name = "baz"

[[commands]]
name = "greet"
runnable = true

[[commands.commands]]
name = "loudly"
"#;

#[test]
fn manifest_declarations_link_like_code_declarations() {

	let manifest = PluginManifest::from_toml( MANIFEST ).expect( "manifest should parse" );
	assert_eq!( manifest.id().as_str(), "hello" );
	assert_eq!( manifest.commands().len(), 2 );
	assert_eq!( manifest.commands()[0].place_under(), Some( "ignite scaffold" ));

	let ( id, commands ) = manifest.into_parts();
	let mut root = ignite_tree();
	LinkSession::new()
		.link_plugin( &mut root, &silent_plugin( id.as_str() ), commands )
		.expect( "link failed" );

	assert_eq!( root.to_string(), "\
ignite
  scaffold
    chain* --path=string
    foo --dry-run=bool --path=string
      bar*
      baz*
  greet*
    loudly*
" );

	let foo = root.child( "scaffold" ).and_then(| scaffold | scaffold.child( "foo" )).expect( "foo missing" );
	assert_eq!( foo.short(), "Scaffold a foo" );
	assert_eq!( foo.usage(), Some( "[name]" ));
	let path = foo.flags().get( "path" ).expect( "path flag missing" );
	assert_eq!( path.kind(), FlagKind::String );
	assert_eq!( path.default_value(), Some( "." ));
	assert_eq!( path.shorthand(), Some( 'p' ));
	assert!( root.child( "greet" ).is_some_and( CommandNode::runnable ));

}

#[test]
fn nested_commands_cannot_carry_a_placement_hint() {

	let manifest = r#"
id = "hello"

[[commands]]
name = "foo"

[[commands.commands]]
name = "bar"
place-under = "scaffold"
"#;

	match PluginManifest::from_toml( manifest ) {
		Err( ManifestError::Toml( _ )) => {}
		value => panic!( "Expected Toml error, found: {:#?}", value ),
	}

}

#[test]
fn unknown_flag_kind_is_rejected() {

	let manifest = r#"
id = "hello"

[[commands]]
name = "foo"

[commands.flags.level]
kind = "complex128"
"#;

	assert!( matches!( PluginManifest::from_toml( manifest ), Err( ManifestError::Toml( _ ))));

}

#[test]
fn manifest_without_commands_is_empty() {

	let manifest = PluginManifest::from_toml( r#"id = "quiet""# ).expect( "manifest should parse" );
	assert!( manifest.commands().is_empty() );

}

#[test]
fn missing_manifest_file_is_an_io_error() {

	let path = std::env::temp_dir().join( "cmd-link-no-such-manifest.toml" );

	assert!( matches!( PluginManifest::load( path ), Err( ManifestError::Io( _ ))));

}

#[test]
fn manifest_loads_from_disk() {

	let path = std::env::temp_dir().join( format!( "cmd-link-manifest-{}.toml", std::process::id() ));
	std::fs::write( &path, MANIFEST ).expect( "failed to write manifest" );

	let loaded = PluginManifest::load( &path );
	let _ = std::fs::remove_file( &path );

	assert_eq!( loaded.expect( "manifest should load" ), PluginManifest::from_toml( MANIFEST ).expect( "manifest should parse" ));

}
