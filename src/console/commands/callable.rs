/// One `moodoo` subcommand, resolved from clap arguments and run to completion.
///
/// Commands own their runtime: async catalog calls are driven with
/// `build_runtime().block_on(..)` inside `call`.
pub trait CallableTrait {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>>;
}
