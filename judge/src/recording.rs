use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;
use splendor::{Action, GameState, Noble, PlayerKey, Tokens};

/// Writes every game as `game_NNNNNN.json` into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    turns: Vec<TurnRecord>,
}

#[derive(Serialize)]
pub struct TurnRecord {
    pub player: PlayerKey,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noble: Option<Noble>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<Tokens>,
}

#[derive(Serialize)]
struct GameRecording<'a> {
    players: &'a [String],
    turns: &'a [TurnRecord],
    scores: Vec<u8>,
    winner: Option<PlayerKey>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            turns: Vec::new(),
        })
    }

    pub fn store_turn(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    /// Attaches a noble or a drop to the turn stored last.
    pub fn amend_last_turn(&mut self, amend: impl FnOnce(&mut TurnRecord)) {
        if let Some(turn) = self.turns.last_mut() {
            amend(turn);
        }
    }

    /// Drops the turns of a game that ended without a result.
    pub fn discard_game(&mut self) {
        self.turns.clear();
    }

    pub fn write_game_recording(
        &mut self,
        players: &[String],
        state: &GameState,
    ) -> anyhow::Result<()> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(filepath)?);
        let turns = std::mem::take(&mut self.turns);
        let recording = GameRecording {
            players,
            turns: &turns,
            scores: state.players.iter().map(|p| p.score).collect(),
            winner: state.winner(),
        };
        serde_json::to_writer_pretty(writer, &recording)?;
        self.num += 1;
        Ok(())
    }
}
