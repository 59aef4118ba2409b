use itertools::Itertools;

use crate::error::{Result, TttError};
use crate::game::common::{GameColor, GamePlayer, GameState};
use crate::ttt::ttt_game::{GridLayout, TttGame};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fs, thread};

pub trait PlayerBuilder: Sync + Send {
    fn new_player(&self) -> Box<dyn GamePlayer>;
    fn name(&self) -> String;
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ComparisonResult {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
    /// Average duration of a single match, in seconds
    pub avg_match_secs: f64,
}

impl ComparisonResult {
    pub fn games_num(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Plays many independent matches between the same two seats, spread over several threads
pub struct PlayerComparator {
    player_x_builder: Arc<dyn PlayerBuilder>,
    player_o_builder: Arc<dyn PlayerBuilder>,
    grid_size: usize,
    thread_num: u32,
}

impl PlayerComparator {
    pub fn new(
        player_x_builder: Box<dyn PlayerBuilder>,
        player_o_builder: Box<dyn PlayerBuilder>,
        grid_size: usize,
        thread_num: u32,
    ) -> Result<Self> {
        assert!(thread_num > 0);
        GridLayout::new(grid_size)?;
        Ok(Self {
            player_x_builder: Arc::from(player_x_builder),
            player_o_builder: Arc::from(player_o_builder),
            grid_size,
            thread_num,
        })
    }

    pub fn matchup_name(&self) -> String {
        format!("{} vs {}", self.player_x_builder.name(), self.player_o_builder.name())
    }

    pub fn compare_players(&self, games_num: u32) -> Result<ComparisonResult> {
        let x_wins = Arc::new(AtomicU32::new(0));
        let o_wins = Arc::new(AtomicU32::new(0));
        let draws = Arc::new(AtomicU32::new(0));

        let job_builder = |thread_idx: u32| {
            let thread_games_num =
                games_num * (thread_idx + 1) / self.thread_num - games_num * thread_idx / self.thread_num;

            let worker = ComparatorWorker {
                player_x_builder: Arc::clone(&self.player_x_builder),
                player_o_builder: Arc::clone(&self.player_o_builder),
                grid_size: self.grid_size,
                games_num: thread_games_num,
                x_wins: Arc::clone(&x_wins),
                o_wins: Arc::clone(&o_wins),
                draws: Arc::clone(&draws),
            };

            move || worker.compare_players()
        };

        /* Spawn thread_num-1 to jobs [1..thread_num-1] */
        let threads = (1..self.thread_num)
            .map(|thread_idx| thread::spawn(job_builder(thread_idx)))
            .collect_vec();

        /* Use current thread to do job 0, then join all threads before looking at any error */
        let job_results = std::iter::once(job_builder(0)())
            .chain(
                threads
                    .into_iter()
                    .map(|t| t.join().expect("comparator worker panicked")),
            )
            .collect_vec();
        let mut total_duration = Duration::ZERO;
        for job_result in job_results {
            total_duration += job_result?;
        }

        let avg_match_secs = if games_num > 0 {
            total_duration.as_secs_f64() / games_num as f64
        } else {
            0.0
        };
        Ok(ComparisonResult {
            x_wins: x_wins.load(Ordering::Relaxed),
            o_wins: o_wins.load(Ordering::Relaxed),
            draws: draws.load(Ordering::Relaxed),
            avg_match_secs,
        })
    }
}

struct ComparatorWorker {
    player_x_builder: Arc<dyn PlayerBuilder>,
    player_o_builder: Arc<dyn PlayerBuilder>,
    grid_size: usize,
    games_num: u32,
    x_wins: Arc<AtomicU32>,
    o_wins: Arc<AtomicU32>,
    draws: Arc<AtomicU32>,
}

impl ComparatorWorker {
    /// Returns the time spent playing
    fn compare_players(&self) -> Result<Duration> {
        let mut player_x = self.player_x_builder.new_player();
        let mut player_o = self.player_o_builder.new_player();
        let mut duration = Duration::ZERO;
        for game_idx in 0..self.games_num {
            let start_time = Instant::now();
            let mut game = TttGame::new(self.grid_size)?;
            let state = game.play_until_over(player_x.as_mut(), player_o.as_mut())?;
            duration += start_time.elapsed();

            match state {
                GameState::Won(GameColor::Player1) => &self.x_wins,
                GameState::Won(GameColor::Player2) => &self.o_wins,
                GameState::Draw => &self.draws,
                GameState::InProgress => unreachable!("match returned before it was over"),
            }
            .fetch_add(1, Ordering::Relaxed);
            log::debug!("Game {} done", game_idx);
        }
        Ok(duration)
    }
}

pub fn load_results(result_file: &Path) -> Result<json::JsonValue> {
    let content = match fs::read_to_string(result_file) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(json::JsonValue::new_object()),
        Err(e) => return Err(e.into()),
    };
    let results = json::parse(&content).map_err(|e| TttError::ResultsFormat(e.to_string()))?;
    if !results.is_object() {
        return Err(TttError::ResultsFormat(String::from("expected a JSON object")));
    }
    Ok(results)
}

/// Store the result under the matchup name, keeping the other matchups already in the file
pub fn save_result(result_file: &Path, matchup: &str, result: &ComparisonResult) -> Result<()> {
    let mut results = load_results(result_file)?;
    results[matchup] = json::object! {
        X: result.x_wins,
        O: result.o_wins,
        Draw: result.draws,
        Time: result.avg_match_secs,
    };
    fs::write(result_file, results.pretty(4))?;
    Ok(())
}

pub fn format_results(results: &json::JsonValue) -> String {
    let mut lines = vec![format!(
        "{:<30} {:^11} {:^11} {:^11} {:^11} {:^11}",
        "", "X Wins", "O Wins", "Draws", "Total", "(W - L - D) time/match"
    )];
    for (matchup, result) in results.entries() {
        let counts = ["X", "O", "Draw"].map(|key| result[key].as_u32().unwrap_or(0));
        let total: u32 = counts.iter().sum();
        if total == 0 {
            continue;
        }
        let [x_pct, o_pct, draw_pct] = counts.map(|n| format!("{:.1}%", n as f64 * 100.0 / total as f64));
        let w_l_d = format!("({:<5} - {:<5} - {:<5})", counts[0], counts[1], counts[2]);
        lines.push(format!(
            "{:<30} {:^11} {:^11} {:^11} {:^11} {:^11} {:.5}",
            format!("{}:", matchup),
            x_pct,
            o_pct,
            draw_pct,
            total,
            w_l_d,
            result["Time"].as_f64().unwrap_or(0.0)
        ));
    }
    lines.join("\n")
}

pub fn display_results(result_file: &Path) -> Result<()> {
    let results = load_results(result_file)?;
    if results.is_empty() {
        println!("No results to display");
        return Ok(());
    }
    println!("\nResults from {}:\n", result_file.display());
    println!("{}\n", format_results(&results));
    Ok(())
}
