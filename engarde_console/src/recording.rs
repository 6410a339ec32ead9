use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use engarde::{Mode, PlayerId, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Writes every finished round as a JSON file into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    steps: Vec<RecordedStep>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            steps: Vec::new(),
        })
    }

    pub fn store_step(&mut self, player: Option<PlayerId>, input: &str, outcome: Result<&Response, String>) {
        let (response, rejection) = match outcome {
            Ok(response) => (Some(response.clone()), None),
            Err(rejection) => (None, Some(rejection)),
        };
        self.steps.push(RecordedStep {
            player,
            input: String::from(input),
            response,
            rejection,
        });
    }

    /// Writes the steps stored since the last call to `round_NNNNNN.json`.
    pub fn write_round_recording(
        &mut self,
        round: u32,
        mode: Mode,
        winner: Option<PlayerId>,
    ) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("round_{:0>6}.json", self.num));
        let recording = RoundRecording {
            round,
            mode,
            winner,
            steps: std::mem::take(&mut self.steps),
        };
        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, &recording)?;
        debug!(path = %filepath.display(), steps = recording.steps.len(), "Round recorded");
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Serialize, Deserialize)]
pub struct RoundRecording {
    pub round: u32,
    pub mode: Mode,
    pub winner: Option<PlayerId>,
    pub steps: Vec<RecordedStep>,
}

#[derive(Serialize, Deserialize)]
pub struct RecordedStep {
    pub player: Option<PlayerId>,
    pub input: String,
    pub response: Option<Response>,
    /// The corrective prompt, if the input was rejected.
    pub rejection: Option<String>,
}

#[cfg(test)]
mod tests {
    use engarde::PhaseKind;

    use super::*;

    #[test]
    fn missing_directory_is_an_error() {
        let path = std::env::temp_dir().join("engarde-recorder-does-not-exist-4711");
        assert!(Recorder::new(path).is_err());
    }

    #[test]
    fn writes_numbered_round_files() {
        let directory = std::env::temp_dir().join(format!("engarde-recorder-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        let mut recorder = Recorder::new(directory.clone()).unwrap();
        let response = Response {
            phase: PhaseKind::RoundEnd,
            prompt: String::from("Player 1 wins the round!"),
            actions: Vec::new(),
        };
        recorder.store_step(Some(PlayerId::One), "do 1", Ok(&response));
        recorder.store_step(Some(PlayerId::Two), "card 2 9", Err(String::from("No card")));
        let first = recorder
            .write_round_recording(1, Mode::Basic, Some(PlayerId::One))
            .unwrap();
        let second = recorder.write_round_recording(2, Mode::Basic, None).unwrap();
        assert!(first.ends_with("round_000001.json"));
        assert!(second.ends_with("round_000002.json"));

        let recording: RoundRecording =
            serde_json::from_reader(File::open(&first).unwrap()).unwrap();
        assert_eq!(recording.winner, Some(PlayerId::One));
        assert_eq!(recording.steps.len(), 2);
        assert_eq!(recording.steps[1].rejection.as_deref(), Some("No card"));
        let recording: RoundRecording =
            serde_json::from_reader(File::open(&second).unwrap()).unwrap();
        assert!(recording.steps.is_empty());
        std::fs::remove_dir_all(&directory).unwrap();
    }
}
