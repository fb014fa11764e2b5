use crate::command::CommandNode ;
use crate::linker::LinkError ;



/// Checks that `target` has no child named `name` yet.
///
/// Only children present at the time of the call are considered, so within a
/// linking session the first plugin to claim a name keeps it and later
/// claimants are rejected. `target_path` is used for reporting only.
///
/// # Errors
/// [`LinkError::NameConflict`] if the name is taken.
pub fn check_name( target: &CommandNode, target_path: &str, name: &str ) -> Result<(), LinkError> {
	match target.child( name ) {
		None => Ok(()),
		Some( _ ) => Err( LinkError::NameConflict {
			command: name.to_string(),
			target: target_path.to_string(),
		}),
	}
}
