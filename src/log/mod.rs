use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Install the fmt subscriber. `--debug` forces debug level; otherwise
/// `CONTENTGEN_LOG` (env-filter syntax) or `warn`.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new("contentgen=debug")
    } else {
        EnvFilter::try_from_env("CONTENTGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub struct SavedPaths {
    pub dir: PathBuf,
    pub prompt: PathBuf,
    pub response: PathBuf,
}

pub fn run_dir(root: &Path, run: Uuid) -> PathBuf {
    root.join(".contentgen").join("runs").join(run.to_string())
}

/// Write the prompt and raw provider text of one generation under
/// `<root>/.contentgen/runs/<run>/`.
pub fn save_generation(root: &Path, run: Uuid, stage: &str, prompt_text: &str, raw: &str) -> anyhow::Result<SavedPaths> {
    let dir = run_dir(root, run);
    fs::create_dir_all(&dir)?;

    let prompt = dir.join(format!("{stage}.prompt.txt"));
    fs::write(&prompt, prompt_text)?;
    let response = dir.join(format!("{stage}.response.txt"));
    fs::write(&response, raw)?;

    tracing::debug!(stage, dir = %dir.display(), "saved generation artifacts");
    Ok(SavedPaths { dir, prompt, response })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_prompt_and_response_side_by_side() {
        let root = tempfile::tempdir().unwrap();
        let run = Uuid::new_v4();
        let saved = save_generation(root.path(), run, "titles", "the prompt", "the reply").unwrap();
        assert_eq!(saved.dir, run_dir(root.path(), run));
        assert_eq!(std::fs::read_to_string(saved.prompt).unwrap(), "the prompt");
        assert_eq!(std::fs::read_to_string(saved.response).unwrap(), "the reply");
    }
}
