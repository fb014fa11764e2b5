use std::time::{ Duration, Instant };
use thiserror::Error ;
use tokio_util::sync::CancellationToken ;

use crate::command::{ Action, CommandNode, PluginBinding };
use crate::invocation::{ Invocation, bind_flags, find_command };
use crate::plugin::{ HandlerError, PluginId };



/// Why a dispatch was stopped.
#[derive( Copy, Clone, Debug, Eq, PartialEq, Hash )]
pub enum CancelReason {
	/// The invoking context cancelled its token.
	Cancelled,
	/// The deadline attached to the context passed.
	DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Cancelled => write!( f, "cancelled" ),
			Self::DeadlineExceeded => write!( f, "deadline exceeded" ),
		}
	}
}

/// Cancellation and deadline signal propagated from the invoking context into
/// a plugin call.
///
/// Cloning yields a handle observing the same token, so a context can be
/// handed to a handler while the caller keeps the means to cancel it.
#[derive( Clone, Debug, Default )]
pub struct DispatchContext {
	token: CancellationToken,
	deadline: Option<Instant>,
}

impl DispatchContext {

	/// A context that is never interrupted unless its token is cancelled.
	pub fn new() -> Self { Self::default() }

	/// Observes an existing token, typically a child of the host's shutdown token.
	pub fn with_token( mut self, token: CancellationToken ) -> Self {
		self.token = token ;
		self
	}

	/// Interrupts the call once `deadline` has passed.
	pub fn with_deadline( mut self, deadline: Instant ) -> Self {
		self.deadline = Some( deadline );
		self
	}

	/// Interrupts the call once `timeout` has elapsed from now.
	///
	/// A timeout too large to represent as an instant sets no deadline.
	pub fn with_timeout( self, timeout: Duration ) -> Self {
		match Instant::now().checked_add( timeout ) {
			Some( deadline ) => self.with_deadline( deadline ),
			None => self,
		}
	}

	#[inline] pub fn token( &self ) -> &CancellationToken { &self.token }
	#[inline] pub fn deadline( &self ) -> Option<Instant> { self.deadline }

	/// Cancels the underlying token.
	pub fn cancel( &self ) { self.token.cancel() }

	/// Reports whether, and why, the call should stop now.
	///
	/// Explicit cancellation takes precedence over an elapsed deadline.
	pub fn interrupted( &self ) -> Option<CancelReason> {
		if self.token.is_cancelled() { return Some( CancelReason::Cancelled ) }
		match self.deadline {
			Some( deadline ) if Instant::now() >= deadline => Some( CancelReason::DeadlineExceeded ),
			_ => None,
		}
	}

}

/// Errors surfaced as the terminal result of a command invocation.
#[derive( Debug, Error )]
pub enum DispatchError {
	/// The selected node only groups subcommands.
	#[error( "command \"{0}\" is not runnable" )] NotRunnable( String ),
	/// A native command's in-process handler failed.
	#[error( "command \"{path}\" failed: {source}" )]
	Native { path: String, source: Box<dyn std::error::Error + Send + Sync> },
	/// The owning plugin failed to run the command.
	#[error( "plugin \"{plugin}\" failed: {source}" )]
	Failure { plugin: PluginId, source: HandlerError },
	/// The call was interrupted by the invoking context.
	#[error( "dispatch to plugin \"{plugin}\" {reason}" )]
	Cancelled { plugin: PluginId, reason: CancelReason },
}

impl DispatchError {
	/// The plugin involved, for failures that crossed the plugin boundary.
	pub fn plugin( &self ) -> Option<&PluginId> {
		match self {
			Self::Failure { plugin, .. } | Self::Cancelled { plugin, .. } => Some( plugin ),
			Self::NotRunnable( _ ) | Self::Native { .. } => None,
		}
	}
}

/// Runs the command bound to `node`.
///
/// Native nodes run their in-process handler directly. Plugin-owned nodes are
/// routed to the owning plugin's handler along with `ctx`; if the context is
/// interrupted before or during the call, the outcome is
/// [`DispatchError::Cancelled`] whatever the handler returned.
///
/// # Errors
/// See [`DispatchError`]. Nothing is retried.
pub fn dispatch( node: &CommandNode, invocation: &Invocation, ctx: &DispatchContext ) -> Result<(), DispatchError> {
	match node.action() {
		Action::Group => Err( DispatchError::NotRunnable( invocation.path().join( " " ))),
		Action::Native( run ) => run( invocation ).map_err(| source | DispatchError::Native {
			path: invocation.path().join( " " ),
			source,
		}),
		Action::Plugin( binding ) => dispatch_to_plugin( binding, invocation, ctx ),
	}
}

fn dispatch_to_plugin( binding: &PluginBinding, invocation: &Invocation, ctx: &DispatchContext ) -> Result<(), DispatchError> {

	let plugin = binding.plugin();
	let cancelled = | reason | {
		tracing::warn!( plugin = %plugin.id(), command = %invocation.path().join( " " ), %reason, "plugin dispatch interrupted" );
		DispatchError::Cancelled { plugin: plugin.id().clone(), reason }
	};

	if let Some( reason ) = ctx.interrupted() { return Err( cancelled( reason )) }

	tracing::debug!( plugin = %plugin.id(), command = %binding.path().join( " " ), args = ?invocation.args(), "dispatching to plugin" );
	let result = plugin.handler().execute( invocation, ctx );

	if let Some( reason ) = ctx.interrupted() { return Err( cancelled( reason )) }

	result.map_err(| source | {
		tracing::warn!( plugin = %plugin.id(), command = %invocation.path().join( " " ), error = %source, "plugin command failed" );
		match source {
			HandlerError::Interrupted => DispatchError::Cancelled {
				plugin: plugin.id().clone(),
				reason: ctx.interrupted().unwrap_or( CancelReason::Cancelled ),
			},
			source => DispatchError::Failure { plugin: plugin.id().clone(), source },
		}
	})

}

/// Resolves `argv` against the tree rooted at `root` and dispatches the result.
///
/// `argv` excludes the program name. Tokens naming subcommands are consumed
/// first, declared flags of the selected node are bound from the rest, and the
/// remainder is passed along as positional arguments.
///
/// # Errors
/// [`DispatchError::NotRunnable`] if `argv` selects a grouping node, otherwise
/// whatever [`dispatch`] returns.
pub fn execute( root: &CommandNode, argv: &[String], ctx: &DispatchContext ) -> Result<(), DispatchError> {
	let ( node, path, residual ) = find_command( root, argv );
	if !node.runnable() { return Err( DispatchError::NotRunnable( path.join( " " ))) }
	let ( flags, args ) = bind_flags( node.flags(), residual );
	dispatch( node, &Invocation::new( path, args, flags ), ctx )
}
