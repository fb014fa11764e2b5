//! Commands as declared by plugins, before they are part of the tree.
//!
//! A [`CommandDeclaration`] describes a command and its nested subcommands.
//! Only top-level declarations choose where they go; that choice lives in the
//! [`PluginCommand`] wrapper, so nested declarations cannot carry a placement
//! hint at all.

use serde::Deserialize ;

use crate::flag::{ Flags, FlagSpec };



/// A command declared by a plugin, possibly with nested subcommands.
///
/// Consumed by the linker, which copies it into new tree nodes.
#[derive( Clone, Debug, Default, Eq, PartialEq, Deserialize )]
#[serde( rename_all = "kebab-case", deny_unknown_fields )]
pub struct CommandDeclaration {
	name: String,
	#[serde( default )]
	usage: Option<String>,
	#[serde( default )]
	short: String,
	#[serde( default )]
	flags: Flags,
	#[serde( default )]
	runnable: bool,
	#[serde( default )]
	commands: Vec<CommandDeclaration>,
}

impl CommandDeclaration {

	/// Declares a command named `name`.
	pub fn new( name: impl Into<String> ) -> Self {
		Self { name: name.into(), ..Self::default() }
	}

	/// Sets the argument synopsis, e.g. `[path]`.
	pub fn with_usage( mut self, usage: impl Into<String> ) -> Self {
		self.usage = Some( usage.into() );
		self
	}

	/// Sets the one-line help text.
	pub fn with_short( mut self, short: impl Into<String> ) -> Self {
		self.short = short.into();
		self
	}

	/// Declares a flag, replacing any previous flag with the same name.
	pub fn with_flag( mut self, name: impl Into<String>, spec: FlagSpec ) -> Self {
		self.flags.insert( name.into(), spec );
		self
	}

	/// Appends a nested subcommand.
	pub fn with_command( mut self, command: CommandDeclaration ) -> Self {
		self.commands.push( command );
		self
	}

	/// Makes the command runnable even though it has subcommands.
	pub fn runnable( mut self ) -> Self {
		self.runnable = true ;
		self
	}

	/// Wraps the declaration for attachment under the command at `hint`.
	pub fn place_under( self, hint: impl Into<String> ) -> PluginCommand {
		PluginCommand { place_under: Some( hint.into() ), declaration: self }
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn usage( &self ) -> Option<&str> { self.usage.as_deref() }
	#[inline] pub fn short( &self ) -> &str { &self.short }
	#[inline] pub fn flags( &self ) -> &Flags { &self.flags }
	#[inline] pub fn commands( &self ) -> &[CommandDeclaration] { &self.commands }

	/// Leaves run, groups do not, unless the declaration opts in explicitly.
	#[inline] pub fn is_runnable( &self ) -> bool { self.runnable || self.commands.is_empty() }

	pub(crate) fn into_parts( self ) -> ( String, Option<String>, String, Flags, Vec<CommandDeclaration> ) {
		( self.name, self.usage, self.short, self.flags, self.commands )
	}

}

/// A top-level plugin declaration: a command plus where to attach it.
#[derive( Clone, Debug, Eq, PartialEq, Deserialize )]
#[serde( from = "TopLevelDeclaration" )]
pub struct PluginCommand {
	place_under: Option<String>,
	declaration: CommandDeclaration,
}

#[derive( Deserialize )]
#[serde( rename_all = "kebab-case", deny_unknown_fields )]
struct TopLevelDeclaration {
	#[serde( default )]
	place_under: Option<String>,
	name: String,
	#[serde( default )]
	usage: Option<String>,
	#[serde( default )]
	short: String,
	#[serde( default )]
	flags: Flags,
	#[serde( default )]
	runnable: bool,
	#[serde( default )]
	commands: Vec<CommandDeclaration>,
}

impl From<TopLevelDeclaration> for PluginCommand {
	fn from( raw: TopLevelDeclaration ) -> Self {
		let TopLevelDeclaration { place_under, name, usage, short, flags, runnable, commands } = raw ;
		Self {
			place_under,
			declaration: CommandDeclaration { name, usage, short, flags, runnable, commands },
		}
	}
}

impl PluginCommand {

	/// Space separated path of the command to attach under. `None` means the root.
	#[inline] pub fn place_under( &self ) -> Option<&str> { self.place_under.as_deref() }

	#[inline] pub fn declaration( &self ) -> &CommandDeclaration { &self.declaration }

	pub(crate) fn into_parts( self ) -> ( Option<String>, CommandDeclaration ) {
		( self.place_under, self.declaration )
	}

}

impl From<CommandDeclaration> for PluginCommand {
	fn from( declaration: CommandDeclaration ) -> Self {
		Self { place_under: None, declaration }
	}
}
