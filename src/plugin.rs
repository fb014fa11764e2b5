//! Plugin identity and the handler seam.
//!
//! The linker never runs plugin code itself. Every command it grafts onto the
//! host tree is bound to a [`Plugin`], which pairs an identifier with a
//! [`PluginHandler`]: the object that knows how to carry an invocation across
//! the plugin boundary (a WebAssembly instance, a subprocess, an RPC client...).

use std::sync::Arc ;
use thiserror::Error ;

use crate::dispatch::DispatchContext ;
use crate::invocation::Invocation ;



/// Unique identifier of a loaded plugin.
#[derive( Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord )]
pub struct PluginId( String );

impl PluginId {
	/// Creates a new plugin identifier.
	pub fn new( id: impl Into<String> ) -> Self { Self( id.into() )}
	#[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl std::fmt::Display for PluginId {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
		f.write_str( &self.0 )
	}
}

impl From<&str> for PluginId {
	fn from( id: &str ) -> Self { Self::new( id ) }
}

impl From<String> for PluginId {
	fn from( id: String ) -> Self { Self( id ) }
}

/// Errors a [`PluginHandler`] may report back to the dispatcher.
#[derive( Debug, Error )]
pub enum HandlerError {
	/// The plugin ran and reported a failure of its own.
	#[error( "{0}" )] Failed( String ),
	/// Failed to acquire the plugin instance (a previous call panicked while holding it).
	#[error( "Lock Rejected" )] LockRejected,
	/// The plugin does not export the entry point the handler calls into.
	#[error( "Missing Export: {0}" )] MissingExport( String ),
	/// The plugin answered with something other than the expected response shape.
	#[error( "Unexpected Response: {0}" )] UnexpectedResponse( String ),
	/// The call was stopped because the dispatch context was cancelled or ran out of time.
	#[error( "Interrupted" )] Interrupted,
	/// The plugin runtime itself failed (trap, instantiation error, ...).
	#[error( "Runtime Exception: {0}" )] Runtime( String ),
}

/// Carries an invocation of a plugin-owned command across the plugin boundary.
///
/// Implementations must observe the [`DispatchContext`]: once
/// [`DispatchContext::interrupted`] reports a reason, the call should stop as
/// soon as possible. Whatever the handler returns after that point is discarded
/// by the dispatcher in favour of a cancellation error.
///
/// # Example
///
/// ```
/// use cmd_link::{ PluginHandler, HandlerError, Invocation, DispatchContext };
///
/// struct Echo ;
///
/// impl PluginHandler for Echo {
/// 	fn execute( &self, invocation: &Invocation, _ctx: &DispatchContext ) -> Result<(), HandlerError> {
/// 		if invocation.args().is_empty() {
/// 			return Err( HandlerError::Failed( "nothing to echo".into() ));
/// 		}
/// 		println!( "{}", invocation.args().join( " " ));
/// 		Ok(())
/// 	}
/// }
/// ```
pub trait PluginHandler: Send + Sync {
	/// Runs the command described by `invocation`.
	///
	/// # Errors
	/// Returns a [`HandlerError`] if the plugin failed or could not be reached.
	fn execute( &self, invocation: &Invocation, ctx: &DispatchContext ) -> Result<(), HandlerError> ;
}

impl<F> PluginHandler for F
where
	F: Fn( &Invocation, &DispatchContext ) -> Result<(), HandlerError> + Send + Sync,
{
	fn execute( &self, invocation: &Invocation, ctx: &DispatchContext ) -> Result<(), HandlerError> {
		self( invocation, ctx )
	}
}

/// A loaded plugin: its identity plus the handler commands are routed to.
///
/// Linked nodes only hold an `Arc` to the plugin, never structural ownership of
/// anything in it.
pub struct Plugin {
	id: PluginId,
	handler: Box<dyn PluginHandler>,
}

impl Plugin {

	/// Creates a plugin from its identifier and handler.
	pub fn new( id: impl Into<PluginId>, handler: impl PluginHandler + 'static ) -> Self {
		Self { id: id.into(), handler: Box::new( handler ) }
	}

	/// Convenience constructor returning the shared handle the linker expects.
	pub fn shared( id: impl Into<PluginId>, handler: impl PluginHandler + 'static ) -> Arc<Self> {
		Arc::new( Self::new( id, handler ))
	}

	#[inline] pub fn id( &self ) -> &PluginId { &self.id }
	#[inline] pub fn handler( &self ) -> &dyn PluginHandler { self.handler.as_ref() }

}

impl std::fmt::Debug for Plugin {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Plugin" )
			.field( "id", &self.id )
			.field( "handler", &"<handler>" )
			.finish()
	}
}
