//! Flag declarations.
//!
//! Flags are stored opaquely: the linker only guarantees that flag names are
//! unique within one command, which [`Flags`] enforces by being a map.

use std::collections::BTreeMap ;
use serde::Deserialize ;



/// Flags declared by a single command, keyed by flag name.
///
/// A `BTreeMap` keeps names unique and iterates them in name order.
pub type Flags = BTreeMap<String, FlagSpec> ;

/// The declared value type of a flag.
///
/// Type names mirror the ones used by the flag library of the host tool, so
/// a rendered tree reads `--path=string` or `--gas=uint`.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize )]
#[serde( rename_all = "camelCase" )]
pub enum FlagKind {
	#[default] String,
	Bool,
	Int,
	Uint,
	Float64,
	StringSlice,
	Duration,
}

impl FlagKind {
	/// Whether a bare `--name` with no value is meaningful for this kind.
	#[inline] pub fn is_switch( self ) -> bool { self == Self::Bool }
}

impl std::fmt::Display for FlagKind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		f.write_str( match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Uint => "uint",
			Self::Float64 => "float64",
			Self::StringSlice => "stringSlice",
			Self::Duration => "duration",
		})
	}
}

/// Declaration of a single flag: its type tag plus optional default and help.
#[derive( Clone, Eq, PartialEq, Debug, Default, Deserialize )]
#[serde( deny_unknown_fields )]
pub struct FlagSpec {
	#[serde( default )]
	kind: FlagKind,
	#[serde( default )]
	default: Option<String>,
	#[serde( default )]
	usage: String,
	#[serde( default )]
	shorthand: Option<char>,
}

impl FlagSpec {

	/// Creates a flag of the given kind with no default and no help text.
	pub fn new( kind: FlagKind ) -> Self {
		Self { kind, ..Self::default() }
	}

	/// Sets the textual default bound when the flag is absent from the command line.
	pub fn with_default( mut self, default: impl Into<String> ) -> Self {
		self.default = Some( default.into() );
		self
	}

	/// Sets the help text.
	pub fn with_usage( mut self, usage: impl Into<String> ) -> Self {
		self.usage = usage.into();
		self
	}

	/// Sets a single-letter alias, e.g. `-p` for `--path`.
	pub fn with_shorthand( mut self, shorthand: char ) -> Self {
		self.shorthand = Some( shorthand );
		self
	}

	#[inline] pub fn kind( &self ) -> FlagKind { self.kind }
	#[inline] pub fn default_value( &self ) -> Option<&str> { self.default.as_deref() }
	#[inline] pub fn usage( &self ) -> &str { &self.usage }
	#[inline] pub fn shorthand( &self ) -> Option<char> { self.shorthand }

}
