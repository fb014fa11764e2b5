//! Grafting plugin commands onto the host tree.
//!
//! Linking a top-level [`PluginCommand`] resolves its placement hint, checks
//! its name against the children already present at the target, attaches a
//! new node and recurses into the nested declarations with the same
//! check-then-attach step. Runnable nodes created along the way are bound to
//! the owning plugin so the dispatcher can route invocations back to it.
//!
//! Each attach step returns a `Result` and the recursion stops at the first
//! error. Nodes attached before the error stay attached; nothing after it is
//! attempted.

use std::sync::Arc ;
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::command::{ Action, CommandNode, PluginBinding };
use crate::conflict::check_name ;
use crate::declaration::{ CommandDeclaration, PluginCommand };
use crate::plugin::{ Plugin, PluginId };
use crate::resolver::{ Placement, ResolveError, resolve_placement };



/// Errors that abort linking of a plugin's declarations.
#[derive( Clone, Debug, Error, Eq, PartialEq )]
pub enum LinkError {
	/// The placement hint names a path with no matching command.
	#[error( "unable to find command path \"{hint}\" for plugin command \"{command}\"" )]
	PlacementNotFound { command: String, hint: String },
	/// The placement hint names a runnable command.
	#[error( "can't attach plugin command \"{command}\" to runnable command \"{target}\"" )]
	InvalidPlacementTarget { command: String, target: String },
	/// A command with the same name already exists at the target.
	#[error( "plugin command \"{command}\" already exists under \"{target}\"" )]
	NameConflict { command: String, target: String },
}

impl LinkError {

	fn from_resolve( error: ResolveError, command: &str ) -> Self {
		match error {
			ResolveError::NoSuchPath( hint ) => Self::PlacementNotFound { command: command.to_string(), hint },
			ResolveError::RunnableTarget( target ) => Self::InvalidPlacementTarget { command: command.to_string(), target },
		}
	}

	/// Name of the offending plugin command.
	pub fn command( &self ) -> &str {
		match self {
			Self::PlacementNotFound { command, .. }
			| Self::InvalidPlacementTarget { command, .. }
			| Self::NameConflict { command, .. } => command,
		}
	}

}

/// Links the declarations of a single plugin into the tree rooted at `root`.
///
/// Declarations are processed in order and linking stops at the first error.
///
/// # Errors
/// The first [`LinkError`] encountered.
pub fn link<C>( root: &mut CommandNode, plugin: &Arc<Plugin>, commands: C ) -> Result<(), LinkError>
where
	C: IntoIterator,
	C::Item: Into<PluginCommand>,
{
	commands.into_iter().try_for_each(| command | link_command( root, plugin, command.into() ))
}

fn link_command( root: &mut CommandNode, plugin: &Arc<Plugin>, command: PluginCommand ) -> Result<(), LinkError> {
	let ( hint, declaration ) = command.into_parts();
	let hint = hint.unwrap_or_default();
	let Placement { node, path } = resolve_placement( root, &hint )
		.map_err(| error | LinkError::from_resolve( error, declaration.name() ))?;
	attach( node, &path, plugin, declaration )
}

fn attach(
	parent: &mut CommandNode,
	parent_path: &str,
	plugin: &Arc<Plugin>,
	declaration: CommandDeclaration,
) -> Result<(), LinkError> {

	check_name( parent, parent_path, declaration.name() )?;

	let runnable = declaration.is_runnable();
	let ( name, usage, short, flags, commands ) = declaration.into_parts();
	let path = format!( "{} {}", parent_path, name );

	let action = match runnable {
		true => path.split_whitespace()
			.map( String::from )
			.collect::<Vec<_>>()
			.pipe(| segments | Action::Plugin( PluginBinding::new( Arc::clone( plugin ), segments ))),
		false => Action::Group,
	};
	let mut node = CommandNode::with_action( name, action ).with_flags( flags ).with_short( short );
	if let Some( usage ) = usage { node = node.with_usage( usage ); }

	let node = parent.push_child( node );
	tracing::debug!( plugin = %plugin.id(), command = %path, runnable, "attached plugin command" );

	for child in commands {
		attach( node, &path, plugin, child )?;
	}
	Ok(())

}

/// What to do with the remaining plugins once one of them fails to link.
#[derive( Copy, Clone, Debug, Default, Eq, PartialEq, Hash )]
pub enum LinkPolicy {
	/// Stop the whole session at the first failure.
	#[default] AbortSession,
	/// Abandon only the failing plugin's remaining declarations.
	ContinueWithOtherPlugins,
}

/// Outcome of a [`LinkSession::link_all`] pass.
#[derive( Clone, Debug, Default )]
pub struct LinkReport {
	linked: Vec<PluginId>,
	failures: Vec<( PluginId, LinkError )>,
	skipped: Vec<PluginId>,
}

impl LinkReport {

	/// Plugins whose declarations were all linked.
	#[inline] pub fn linked( &self ) -> &[PluginId] { &self.linked }

	/// Plugins that failed, with the error that stopped them, in processing order.
	#[inline] pub fn failures( &self ) -> &[( PluginId, LinkError )] { &self.failures }

	/// Plugins never attempted because the session was aborted.
	#[inline] pub fn skipped( &self ) -> &[PluginId] { &self.skipped }

	#[inline] pub fn is_success( &self ) -> bool { self.failures.is_empty() }

	/// The first error of the session, if any.
	pub fn first_error( &self ) -> Option<&LinkError> {
		self.failures.first().map(|( _, error )| error )
	}

	/// Collapses the report into the first error of the session.
	///
	/// # Errors
	/// The first [`LinkError`] recorded.
	pub fn into_result( self ) -> Result<(), LinkError> {
		match self.failures.into_iter().next() {
			Some(( _, error )) => Err( error ),
			None => Ok(()),
		}
	}

}

/// One linking pass over all plugins loaded at startup.
#[derive( Clone, Debug, Default )]
pub struct LinkSession {
	policy: LinkPolicy,
}

impl LinkSession {

	/// Creates a session with the default [`LinkPolicy::AbortSession`] policy.
	pub fn new() -> Self { Self::default() }

	/// Sets what happens to later plugins once one fails.
	pub fn with_policy( mut self, policy: LinkPolicy ) -> Self {
		self.policy = policy ;
		self
	}

	#[inline] pub fn policy( &self ) -> LinkPolicy { self.policy }

	/// Links one plugin, stopping at its first error.
	///
	/// # Errors
	/// The first [`LinkError`] encountered.
	pub fn link_plugin<C>( &self, root: &mut CommandNode, plugin: &Arc<Plugin>, commands: C ) -> Result<(), LinkError>
	where
		C: IntoIterator,
		C::Item: Into<PluginCommand>,
	{
		let _span = tracing::debug_span!( "link_plugin", plugin = %plugin.id() ).entered();
		link( root, plugin, commands ).inspect_err(| error | {
			tracing::warn!( plugin = %plugin.id(), command = error.command(), %error, "failed to link plugin command" );
		})
	}

	/// Links every plugin in the order supplied, applying the session policy
	/// when one of them fails.
	pub fn link_all<P, C>( &self, root: &mut CommandNode, plugins: P ) -> LinkReport
	where
		P: IntoIterator<Item = ( Arc<Plugin>, C )>,
		C: IntoIterator,
		C::Item: Into<PluginCommand>,
	{
		let mut report = LinkReport::default();
		let mut plugins = plugins.into_iter();

		for ( plugin, commands ) in plugins.by_ref() {
			match self.link_plugin( root, &plugin, commands ) {
				Ok(()) => report.linked.push( plugin.id().clone() ),
				Err( error ) => {
					report.failures.push(( plugin.id().clone(), error ));
					if self.policy == LinkPolicy::AbortSession { break }
				}
			}
		}

		report.skipped = plugins.map(|( plugin, _ )| plugin.id().clone() ).collect();
		if !report.skipped.is_empty() {
			tracing::warn!( skipped = ?report.skipped, "linking session aborted" );
		}
		report
	}

}
