use hangman_types::{MaskCell, PlayerStats, ViewModel};

use crate::{RoundState, win_percentage};

/// Shown in place of the missed letters before the first wrong guess
pub const NO_MISSES: &str = "None yet";

/// Turns round state into what the UI draws. Everything here is pure.
pub struct PresentationAdapter;

impl PresentationAdapter {
    pub fn to_view_model(round: &RoundState, stats: &PlayerStats, stages: &[String]) -> ViewModel {
        let picture_index = Self::picture_index(round.miss_count(), stages.len());
        let reveal_mask = Self::reveal_mask(round);
        let win_percent = win_percentage(stats);

        ViewModel {
            player_name: stats.player_name.clone(),
            picture_index,
            picture: stages
                .get(picture_index as usize)
                .cloned()
                .unwrap_or_default(),
            masked_word: Self::masked_word(&reveal_mask),
            reveal_mask,
            missed_letters: round.missed_letters().to_vec(),
            missed_display: Self::missed_display(round.missed_letters()),
            misses_remaining: round.misses_remaining(),
            outcome: round.outcome(),
            wins: stats.wins,
            losses: stats.losses,
            win_percent,
            win_percent_display: Self::percent_display(win_percent),
            stats_display: Self::stats_display(stats),
        }
    }

    /// Stage to draw for `miss_count`, clamped to the last stage
    pub fn picture_index(miss_count: u32, stage_count: usize) -> u32 {
        let last_stage = stage_count.saturating_sub(1) as u32;
        miss_count.min(last_stage)
    }

    pub fn reveal_mask(round: &RoundState) -> Vec<MaskCell> {
        round
            .word()
            .as_str()
            .chars()
            .map(|ch| {
                if !ch.is_ascii_alphabetic() {
                    MaskCell::Space
                } else if round.guessed_letters().contains(&ch.to_ascii_lowercase()) {
                    MaskCell::Revealed(ch)
                } else {
                    MaskCell::Hidden
                }
            })
            .collect()
    }

    /// Text form of the mask: hidden letters as `_`
    pub fn masked_word(mask: &[MaskCell]) -> String {
        mask.iter()
            .map(|cell| match cell {
                MaskCell::Revealed(ch) => *ch,
                MaskCell::Hidden => '_',
                MaskCell::Space => ' ',
            })
            .collect()
    }

    pub fn missed_display(missed: &[char]) -> String {
        if missed.is_empty() {
            return NO_MISSES.to_string();
        }
        missed
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn percent_display(percent: f64) -> String {
        format!("{percent:.1}%")
    }

    pub fn stats_display(stats: &PlayerStats) -> String {
        format!(
            "Wins: {} | Losses: {} | Win %: {}",
            stats.wins,
            stats.losses,
            Self::percent_display(win_percentage(stats))
        )
    }
}
