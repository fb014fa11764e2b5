//! Placement resolution.
//!
//! A placement hint is a space separated command path such as
//! `"ignite scaffold"`. The leading root name is optional, so `"scaffold"`
//! names the same node.

use itertools::Itertools ;
use thiserror::Error ;

use crate::command::CommandNode ;



/// Why a placement hint could not be turned into an attachment target.
#[derive( Clone, Debug, Error, Eq, PartialEq )]
pub enum ResolveError {
	/// Some segment of the hint names no existing command. Carries the hint as supplied.
	#[error( "no command at path \"{0}\"" )] NoSuchPath( String ),
	/// The hint names a runnable command, which owns no namespace for subcommands.
	#[error( "command \"{0}\" is runnable" )] RunnableTarget( String ),
}

/// An attachment target found by [`resolve_placement`].
#[derive( Debug )]
pub struct Placement<'a> {
	/// The grouping node new commands attach under.
	pub node: &'a mut CommandNode,
	/// Its full path, root name included, e.g. `"ignite scaffold"`.
	pub path: String,
}

/// Resolves `hint` to a grouping node of the tree rooted at `root`.
///
/// An empty (or blank) hint resolves to the root itself.
///
/// # Errors
/// [`ResolveError::NoSuchPath`] if a segment is missing,
/// [`ResolveError::RunnableTarget`] if the resolved node is runnable.
pub fn resolve_placement<'a>( root: &'a mut CommandNode, hint: &str ) -> Result<Placement<'a>, ResolveError> {

	let mut segments = hint.split_whitespace().peekable();
	if segments.peek() == Some( &root.name() ) { segments.next(); }
	let segments = segments.collect::<Vec<_>>();

	let path = std::iter::once( root.name() ).chain( segments.iter().copied() ).join( " " );

	let node = segments.iter().try_fold( root, | node, segment | node.child_mut( segment ))
		.ok_or_else(|| ResolveError::NoSuchPath( hint.to_string() ))?;

	if node.runnable() { return Err( ResolveError::RunnableTarget( path )) }

	tracing::trace!( %hint, %path, "resolved placement" );
	Ok( Placement { node, path })

}
