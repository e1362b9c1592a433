use magic_sudoku_core::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Statistics for a single difficulty level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub games_started: usize,
    pub games_won: usize,
    pub best_time_secs: Option<u64>,
    pub total_win_time_secs: u64,
}

impl DifficultyStats {
    pub fn avg_time_secs(&self) -> Option<u64> {
        if self.games_won > 0 {
            Some(self.total_win_time_secs / self.games_won as u64)
        } else {
            None
        }
    }
}

/// Player statistics, persisted between runs as JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsManager {
    by_difficulty: HashMap<String, DifficultyStats>,
}

impl StatsManager {
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("magic_sudoku_stats.json")
    }

    /// Load stats from file, starting fresh if unreadable
    pub fn load() -> Self {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save stats to file
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(Self::save_path(), json);
        }
    }

    pub fn for_difficulty(&self, difficulty: Difficulty) -> DifficultyStats {
        self.by_difficulty
            .get(&difficulty.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Record that a new game was dealt (caller persists with [`save`])
    ///
    /// [`save`]: StatsManager::save
    pub fn record_started(&mut self, difficulty: Difficulty) {
        self.entry(difficulty).games_started += 1;
    }

    /// Record a solved game and its time
    pub fn record_win(&mut self, difficulty: Difficulty, time_secs: u64) {
        let stats = self.entry(difficulty);
        stats.games_won += 1;
        stats.total_win_time_secs += time_secs;
        stats.best_time_secs = Some(match stats.best_time_secs {
            Some(best) => best.min(time_secs),
            None => time_secs,
        });
    }

    fn entry(&mut self, difficulty: Difficulty) -> &mut DifficultyStats {
        self.by_difficulty.entry(difficulty.to_string()).or_default()
    }
}

/// Format a second count as MM:SS
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
