// Select the Ignition spec generation rendered by this build.

use ignition_generation::{Generation, GENERATION_ENV};

fn main() {
    let generation = match Generation::from_env_or_default() {
        Ok(generation) => generation,
        Err(e) => {
            eprintln!(
                "The '{}' environment variable selects the Ignition spec generation to render. \
                Valid values are 'v2' or 'v3', or any version within them such as '2.4.0': {}",
                GENERATION_ENV, e,
            );
            std::process::exit(1);
        }
    };
    generation.emit_cfgs();
}
