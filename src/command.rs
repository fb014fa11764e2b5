//! The live command tree.
//!
//! A [`CommandNode`] is either a grouping node (namespacing its children) or a
//! runnable one. What runs is described by its [`Action`]: an in-process
//! closure for commands the host built itself, or a [`PluginBinding`] for
//! commands grafted on by the linker. The dispatcher is the only place that
//! branches on which one is present.

use std::sync::Arc ;

use crate::flag::{ Flags, FlagSpec };
use crate::invocation::Invocation ;
use crate::plugin::Plugin ;



/// In-process handler of a native command.
pub type NativeRun = Arc<dyn Fn( &Invocation ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync> ;

/// Routing information attached to every runnable plugin-owned node.
#[derive( Clone, Debug )]
pub struct PluginBinding {
	plugin: Arc<Plugin>,
	path: Vec<String>,
}

impl PluginBinding {

	pub(crate) fn new( plugin: Arc<Plugin>, path: Vec<String> ) -> Self {
		Self { plugin, path }
	}

	/// The plugin the invocation is routed to.
	#[inline] pub fn plugin( &self ) -> &Arc<Plugin> { &self.plugin }

	/// Full command path of the node at the time it was linked, root name included.
	#[inline] pub fn path( &self ) -> &[String] { &self.path }

}

/// What happens when a node is invoked.
#[derive( Clone, Default )]
pub enum Action {
	/// Grouping node: it only namespaces its children and cannot be run.
	#[default] Group,
	/// Native command, executed in-process.
	Native( NativeRun ),
	/// Plugin command, routed through the dispatcher to its owning plugin.
	Plugin( PluginBinding ),
}

impl std::fmt::Debug for Action {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Group => f.write_str( "Group" ),
			Self::Native( _ ) => f.write_str( "Native(<closure>)" ),
			Self::Plugin( binding ) => f.debug_tuple( "Plugin" ).field( binding ).finish(),
		}
	}
}

/// A node of the live command tree.
///
/// Sibling names are unique. The tree primitives below do not enforce that
/// themselves: callers that attach nodes at runtime go through
/// [`check_name`]( crate::check_name ) first.
#[derive( Clone, Debug, Default )]
pub struct CommandNode {
	name: String,
	usage: Option<String>,
	short: String,
	flags: Flags,
	children: Vec<CommandNode>,
	action: Action,
}

impl CommandNode {

	/// Creates a grouping node.
	pub fn group( name: impl Into<String> ) -> Self {
		Self { name: name.into(), ..Self::default() }
	}

	/// Creates a runnable node executed in-process by `run`.
	pub fn native<F>( name: impl Into<String>, run: F ) -> Self
	where
		F: Fn( &Invocation ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
	{
		Self { name: name.into(), action: Action::Native( Arc::new( run )), ..Self::default() }
	}

	pub(crate) fn with_action( name: impl Into<String>, action: Action ) -> Self {
		Self { name: name.into(), action, ..Self::default() }
	}

	/// Adds a flag declaration, replacing any previous one with the same name.
	pub fn with_flag( mut self, name: impl Into<String>, spec: FlagSpec ) -> Self {
		self.flags.insert( name.into(), spec );
		self
	}

	/// Replaces all flag declarations.
	pub fn with_flags( mut self, flags: Flags ) -> Self {
		self.flags = flags ;
		self
	}

	/// Sets the argument synopsis shown after the name, e.g. `[path]`.
	pub fn with_usage( mut self, usage: impl Into<String> ) -> Self {
		self.usage = Some( usage.into() );
		self
	}

	/// Sets the one-line help text.
	pub fn with_short( mut self, short: impl Into<String> ) -> Self {
		self.short = short.into();
		self
	}

	/// Appends a child while building the host tree.
	///
	/// The host guarantees its own names are unique, this is only checked in debug builds.
	pub fn with_command( mut self, child: CommandNode ) -> Self {
		debug_assert!( self.child( child.name() ).is_none(), "duplicate native command {:?}", child.name() );
		self.children.push( child );
		self
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn usage( &self ) -> Option<&str> { self.usage.as_deref() }
	#[inline] pub fn short( &self ) -> &str { &self.short }
	#[inline] pub fn flags( &self ) -> &Flags { &self.flags }
	#[inline] pub fn action( &self ) -> &Action { &self.action }

	/// Whether invoking this node executes something, as opposed to only grouping children.
	#[inline] pub fn runnable( &self ) -> bool { !matches!( self.action, Action::Group ) }

	/// Whether this node routes to a plugin rather than running in-process.
	#[inline] pub fn is_plugin_owned( &self ) -> bool { matches!( self.action, Action::Plugin( _ )) }

	/// Children in attachment order.
	#[inline] pub fn children( &self ) -> &[CommandNode] { &self.children }

	/// Looks up a direct child by name.
	pub fn child( &self, name: &str ) -> Option<&CommandNode> {
		self.children.iter().find(| child | child.name == name )
	}

	/// Looks up a direct child by name, mutably.
	pub fn child_mut( &mut self, name: &str ) -> Option<&mut CommandNode> {
		self.children.iter_mut().find(| child | child.name == name )
	}

	/// Appends a child and returns a handle to it. Does not check for duplicates.
	pub fn push_child( &mut self, child: CommandNode ) -> &mut CommandNode {
		self.children.push( child );
		let last = self.children.len() - 1 ;
		&mut self.children[last]
	}

	fn render( &self, f: &mut std::fmt::Formatter<'_>, depth: usize ) -> std::fmt::Result {
		write!( f, "{:indent$}{}", "", self.name, indent = depth * 2 )?;
		if self.runnable() { f.write_str( "*" )?; }
		for ( name, spec ) in &self.flags {
			write!( f, " --{}={}", name, spec.kind() )?;
		}
		writeln!( f )?;
		self.children.iter().try_for_each(| child | child.render( f, depth + 1 ))
	}

}

/// Renders the subtree one node per line, indented two spaces per level.
/// Runnable nodes are marked with `*` and followed by their flags.
///
/// ```
/// use cmd_link::{ CommandNode, FlagSpec, FlagKind };
///
/// let tree = CommandNode::group( "ignite" ).with_command(
/// 	CommandNode::native( "version", | _ | Ok(() ))
/// 		.with_flag( "json", FlagSpec::new( FlagKind::Bool )),
/// );
/// assert_eq!( tree.to_string(), "ignite\n  version* --json=bool\n" );
/// ```
impl std::fmt::Display for CommandNode {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		self.render( f, 0 )
	}
}
