pub mod fixtures;

use webgen::{Artifact, Generator, GeneratorBuilder};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A builder preloaded with the fixture dictionary and data.
pub fn fixture_builder(specification: &str) -> Result<GeneratorBuilder, Box<dyn std::error::Error>> {
    Ok(Generator::builder()
        .with_specification(specification)
        .with_data_dictionary(fixtures::DICTIONARY)
        .with_data(fixtures::DATA)?)
}

/// Generates the artifacts of `specification` against the fixture dictionary and data.
pub fn generate(specification: &str) -> Result<Vec<Artifact>, Box<dyn std::error::Error>> {
    init_logger();
    Ok(fixture_builder(specification)?.build()?.generate_artifacts()?)
}

pub fn find<'a>(artifacts: &'a [Artifact], title: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.title() == title)
        .unwrap_or_else(|| panic!("no artifact titled '{title}'"))
}

/// Byte offset of `needle` in `haystack`, failing the test when absent.
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in:\n{haystack}"))
}
