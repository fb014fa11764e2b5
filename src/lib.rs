//! Grafts plugin-declared commands onto a host command tree.
//!
//! A command-line host builds its own command tree at startup. Plugins loaded
//! afterwards declare further commands, and `cmd_link` attaches them to that
//! tree at a point of the plugin's choosing. It rejects placements that make
//! no sense and names that are already taken. Invocations of the new commands
//! are routed back to the plugin instead of running in the host.
//!
//! # Core Concepts
//!
//! - [`CommandNode`]: An element of the live tree. Grouping nodes namespace
//! 	their children; runnable nodes carry an [`Action`], either a native
//! 	in-process closure or a [`PluginBinding`] routing to a plugin.
//!
//! - [`CommandDeclaration`]: A command as declared by a plugin, possibly with
//! 	nested subcommands. A top-level declaration is wrapped in a
//! 	[`PluginCommand`] which also carries its **placement hint**: a space
//! 	separated path such as `"ignite scaffold"` naming the grouping node to
//! 	attach under. The root's own name may be omitted, so `"scaffold"` is
//! 	equivalent. No hint means the root.
//!
//! - [`Plugin`]: A plugin identity paired with the [`PluginHandler`] that carries
//! 	invocations across the plugin boundary. [`WasmPlugin`] is a ready-made
//! 	handler running a WebAssembly component.
//!
//! - [`link`] / [`LinkSession`]: The linker. Declarations are processed in order
//! 	and each one is resolved, name checked and attached. The first failure
//! 	stops the plugin. Whether it also stops the remaining plugins is the
//! 	session's [`LinkPolicy`].
//!
//! - [`dispatch`] / [`execute`]: The dispatcher. Native nodes run in-process,
//! 	plugin nodes are handed to their plugin along with a [`DispatchContext`]
//! 	carrying cancellation and a deadline.
//!
//! # Example
//!
//! ```
//! use std::sync::{ Arc, Mutex };
//! use cmd_link::{
//! 	CommandNode, CommandDeclaration, DispatchContext, FlagKind, FlagSpec,
//! 	HandlerError, Invocation, LinkError, Plugin, execute, link,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The host's own tree, built at startup.
//! let mut root = CommandNode::group( "ignite" ).with_command(
//! 	CommandNode::group( "scaffold" ).with_command(
//! 		CommandNode::native( "chain", | _ | Ok(() ))
//! 			.with_flag( "path", FlagSpec::new( FlagKind::String )),
//! 	),
//! );
//!
//! // A plugin, here with an in-process handler recording what it receives.
//! let received = Arc::new( Mutex::new( Vec::<Invocation>::new() ));
//! let sink = Arc::clone( &received );
//! let plugin = Plugin::shared( "hello", move | invocation: &Invocation, _: &DispatchContext | -> Result<(), HandlerError> {
//! 	sink.lock().unwrap().push( invocation.clone() );
//! 	Ok(())
//! });
//!
//! link( &mut root, &plugin, [
//! 	CommandDeclaration::new( "greet" )
//! 		.with_flag( "loud", FlagSpec::new( FlagKind::Bool ))
//! 		.place_under( "scaffold" ),
//! ])?;
//! assert_eq!( root.to_string(), "\
//! ignite
//!   scaffold
//!     chain* --path=string
//!     greet* --loud=bool
//! ");
//!
//! // Names already taken at the target are refused.
//! match link( &mut root, &plugin, [ CommandDeclaration::new( "scaffold" )]) {
//! 	Err( LinkError::NameConflict { command, target }) => {
//! 		assert_eq!( command, "scaffold" );
//! 		assert_eq!( target, "ignite" );
//! 	}
//! 	other => panic!( "expected a name conflict, got {:?}", other ),
//! }
//!
//! // Invoking the grafted command reaches the plugin.
//! let argv = [ "scaffold", "greet", "--loud", "world" ].map( String::from );
//! execute( &root, &argv, &DispatchContext::new() )?;
//!
//! let received = received.lock().unwrap();
//! assert_eq!( received[0].path(), [ "ignite", "scaffold", "greet" ]);
//! assert_eq!( received[0].args(), [ "world" ]);
//! assert_eq!( received[0].flag( "loud" ), Some( "true" ));
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! Plugin calls may be long running. A [`DispatchContext`] wraps a
//! [`CancellationToken`]( tokio_util::sync::CancellationToken ) and an optional
//! deadline; handlers are expected to stop once
//! [`DispatchContext::interrupted`] reports a reason, and the dispatcher turns any
//! interrupted call into [`DispatchError::Cancelled`] rather than a partial
//! result. See [`WasmPlugin`] for how WebAssembly guests are stopped mid-call.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (attached commands, link failures, plugin
//! dispatch outcomes) and leaves installing a subscriber to the host.

mod flag ;
mod command ;
mod declaration ;
mod manifest ;
mod plugin ;
mod resolver ;
mod conflict ;
mod linker ;
mod invocation ;
mod dispatch ;
mod wasm ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::{ Component, Linker };
#[doc( no_inline )]
pub use tokio_util::sync::CancellationToken ;

pub use flag::{ FlagKind, FlagSpec, Flags };
pub use command::{ Action, CommandNode, NativeRun, PluginBinding };
pub use declaration::{ CommandDeclaration, PluginCommand };
pub use manifest::{ ManifestError, PluginManifest };
pub use plugin::{ HandlerError, Plugin, PluginHandler, PluginId };
pub use resolver::{ Placement, ResolveError, resolve_placement };
pub use conflict::check_name ;
pub use linker::{ LinkError, LinkPolicy, LinkReport, LinkSession, link };
pub use invocation::{ Invocation, bind_flags, find_command };
pub use dispatch::{ CancelReason, DispatchContext, DispatchError, dispatch, execute };
pub use wasm::{ EpochTicker, WasmPlugin };
