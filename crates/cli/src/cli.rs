use std::path::PathBuf;

use clap::Parser;
use pakar_core::Config;

/// Question answering over immigration law documents and curated answers.
///
/// Reads one question per line from stdin and prints a grounded answer.
/// Settings come from the environment (and `.env`); flags override paths.
#[derive(Parser, Debug)]
#[command(name = "pakar", about = "Retrieval-augmented expert system for immigration questions")]
pub struct CliArgs {
    /// Config profile; `{PROFILE}_{KEY}` variables take precedence over `{KEY}`
    #[arg(long, env = "PAKAR_PROFILE")]
    pub profile: Option<String>,

    /// Directory of source documents (overrides DOCS_DIR)
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// JSON file of curated question/answer pairs (overrides QA_FILE)
    #[arg(long)]
    pub qa_file: Option<PathBuf>,

    /// TOML prompt template (overrides PROMPT_FILE)
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Build both indices before reading the first question
    #[arg(long)]
    pub eager: bool,

    /// Answer a single question and exit
    #[arg(long, short)]
    pub question: Option<String>,

    /// Print the retrieved context before each answer
    #[arg(long)]
    pub show_context: bool,
}

impl CliArgs {
    pub fn config(&self) -> Config {
        let mut config = match &self.profile {
            Some(profile) => Config::for_profile(profile),
            None => Config::from_env(),
        };
        if let Some(dir) = &self.docs_dir {
            config.corpus.docs_dir = dir.clone();
        }
        if let Some(file) = &self.qa_file {
            config.corpus.qa_file = file.clone();
        }
        if let Some(file) = &self.prompt_file {
            config.prompt_file = Some(file.clone());
        }
        config
    }
}
