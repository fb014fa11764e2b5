//! Turning a raw argument vector into an [`Invocation`].
//!
//! This is the host's generic execution path in its simplest form: walk the
//! tree by command name, then bind declared flags out of whatever is left.
//! Flag values are passed through as text and never validated.

use crate::command::CommandNode ;
use crate::flag::Flags ;



/// A resolved invocation of a runnable command.
#[derive( Clone, Debug, Default, PartialEq, Eq )]
pub struct Invocation {
	path: Vec<String>,
	args: Vec<String>,
	flags: Vec<( String, String )>,
}

impl Invocation {

	/// Creates an invocation from an already resolved command path, residual
	/// arguments and bound flag values.
	pub fn new(
		path: impl IntoIterator<Item = impl Into<String>>,
		args: impl IntoIterator<Item = impl Into<String>>,
		flags: impl IntoIterator<Item = ( String, String )>,
	) -> Self {
		Self {
			path: path.into_iter().map( Into::into ).collect(),
			args: args.into_iter().map( Into::into ).collect(),
			flags: flags.into_iter().collect(),
		}
	}

	/// Full command path, root name included.
	#[inline] pub fn path( &self ) -> &[String] { &self.path }

	/// Residual positional arguments, in command-line order.
	#[inline] pub fn args( &self ) -> &[String] { &self.args }

	/// Bound flag values as `( name, value )`, in flag-name order.
	#[inline] pub fn flags( &self ) -> &[( String, String )] { &self.flags }

	/// Value bound to `name`, if any.
	pub fn flag( &self, name: &str ) -> Option<&str> {
		self.flags.iter()
			.find(|( flag, _ )| flag == name )
			.map(|( _, value )| value.as_str() )
	}

}

/// Walks `argv` down from `root`, consuming leading tokens that name a child
/// of the node reached so far.
///
/// Returns the deepest node found, its full path (root name included) and the
/// unconsumed remainder of `argv`.
pub fn find_command<'a, 'b>( root: &'a CommandNode, argv: &'b [String] ) -> ( &'a CommandNode, Vec<String>, &'b [String] ) {
	let mut node = root ;
	let mut path = vec![ root.name().to_string() ];
	let mut consumed = 0 ;
	while let Some( child ) = argv.get( consumed ).and_then(| token | node.child( token )) {
		path.push( child.name().to_string() );
		node = child ;
		consumed += 1 ;
	}
	( node, path, &argv[consumed..] )
}

/// Splits `residual` into bound flag values and positional arguments.
///
/// Recognises `--name=value`, `--name value`, `-s value` for declared
/// shorthands and a bare `--name` for switches. `--` stops flag scanning.
/// Undeclared flags stay in the positional arguments. Declared flags that are
/// absent but have a default are bound to it.
pub fn bind_flags( flags: &Flags, residual: &[String] ) -> ( Vec<( String, String )>, Vec<String> ) {

	let mut bound: Vec<( String, String )> = Vec::new();
	let mut args = Vec::new();
	let mut tokens = residual.iter();

	while let Some( token ) = tokens.next() {

		if token == "--" {
			args.extend( tokens.by_ref().cloned() );
			break ;
		}

		let ( name, inline_value ) = match declared_name( flags, token ) {
			Some( found ) => found,
			None => { args.push( token.clone() ); continue ; }
		};
		let Some( spec ) = flags.get( &name ) else { args.push( token.clone() ); continue ; };

		let value = match ( inline_value, spec.kind().is_switch() ) {
			( Some( value ), _ ) => Some( value ),
			( None, true ) => Some( "true".to_string() ),
			( None, false ) => tokens.next().cloned(),
		};
		match value {
			Some( value ) => set( &mut bound, name, value ),
			None => args.push( token.clone() ),
		}
	}

	for ( name, spec ) in flags {
		if let Some( default ) = spec.default_value() {
			if !bound.iter().any(|( bound_name, _ )| bound_name == name ) {
				bound.push(( name.clone(), default.to_string() ));
			}
		}
	}
	bound.sort_by(|( a, _ ), ( b, _ )| a.cmp( b ));

	( bound, args )

}

fn declared_name( flags: &Flags, token: &str ) -> Option<( String, Option<String> )> {
	if let Some( long ) = token.strip_prefix( "--" ) {
		return Some( match long.split_once( '=' ) {
			Some(( name, value )) => ( name.to_string(), Some( value.to_string() )),
			None => ( long.to_string(), None ),
		});
	}
	let short = token.strip_prefix( '-' )?;
	let mut chars = short.chars();
	let letter = chars.next()?;
	let rest = chars.as_str();
	let name = flags.iter().find(|( _, spec )| spec.shorthand() == Some( letter ))?.0.clone();
	Some( match rest.strip_prefix( '=' ) {
		Some( value ) => ( name, Some( value.to_string() )),
		None if rest.is_empty() => ( name, None ),
		None => ( name, Some( rest.to_string() )),
	})
}

fn set( bound: &mut Vec<( String, String )>, name: String, value: String ) {
	match bound.iter_mut().find(|( bound_name, _ )| *bound_name == name ) {
		Some( entry ) => entry.1 = value,
		None => bound.push(( name, value )),
	}
}
