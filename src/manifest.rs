//! TOML command manifests.
//!
//! Plugins that cannot build their declarations in code ship them as a
//! manifest next to their binary:
//!
//! ```toml
//! id = "hello"
//!
//! [[commands]]
//! name = "foo"
//! place-under = "ignite scaffold"
//! short = "Scaffold a foo"
//!
//! [commands.flags.path]
//! kind = "string"
//! default = "."
//!
//! [[commands.commands]]
//! name = "bar"
//! ```

use std::path::Path ;
use pipe_trait::Pipe ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::declaration::PluginCommand ;
use crate::plugin::PluginId ;



/// Errors that can occur while reading a manifest.
#[derive( Debug, Error )]
pub enum ManifestError {
	#[error( "IO error: {0}" )] Io( #[from] std::io::Error ),
	#[error( "TOML parse error: {0}" )] Toml( #[from] toml::de::Error ),
}

/// A plugin's identifier and its ordered top-level command declarations.
#[derive( Clone, Debug, Eq, PartialEq, Deserialize )]
#[serde( deny_unknown_fields )]
pub struct PluginManifest {
	id: String,
	#[serde( default )]
	commands: Vec<PluginCommand>,
}

impl PluginManifest {

	/// Parses a manifest from TOML text.
	///
	/// # Errors
	/// [`ManifestError::Toml`] on malformed input, unknown keys included.
	pub fn from_toml( text: &str ) -> Result<Self, ManifestError> {
		Ok( toml::from_str( text )? )
	}

	/// Reads and parses the manifest at `path`.
	///
	/// # Errors
	/// [`ManifestError::Io`] if the file cannot be read, otherwise as [`Self::from_toml`].
	pub fn load( path: impl AsRef<Path> ) -> Result<Self, ManifestError> {
		std::fs::read_to_string( path )?.pipe(| text | Self::from_toml( &text ))
	}

	#[inline] pub fn id( &self ) -> PluginId { PluginId::new( self.id.as_str() ) }
	#[inline] pub fn commands( &self ) -> &[PluginCommand] { &self.commands }

	/// Splits the manifest into what [`LinkSession::link_plugin`]( crate::LinkSession::link_plugin ) consumes.
	pub fn into_parts( self ) -> ( PluginId, Vec<PluginCommand> ) {
		( PluginId::from( self.id ), self.commands )
	}

}
