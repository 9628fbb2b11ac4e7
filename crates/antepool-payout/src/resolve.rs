//! Winner resolution: scores + split rule → ranked winner list.

use antepool_types::{Participant, SplitRule, UserId};

/// One paid position, produced by [`resolve_winners`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWinner {
    pub user_id: UserId,
    pub score: u64,
    /// 1-based, contiguous.
    pub position: u32,
}

/// Ranks participants by score and takes as many winners as the split rule
/// pays, capped by the participant count.
///
/// If every participant's score is zero or unsubmitted, nobody played a
/// scorable game and the result is empty — no distribution happens. The sort
/// is stable, so equal scores keep their original (join) order.
pub fn resolve_winners(participants: &[Participant], rule: SplitRule) -> Vec<RankedWinner> {
    if participants.iter().all(|p| p.effective_score() == 0) {
        return Vec::new();
    }

    let mut ranked: Vec<&Participant> = participants.iter().collect();
    ranked.sort_by(|a, b| b.effective_score().cmp(&a.effective_score()));
    ranked.truncate(rule.max_winners());

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, participant)| RankedWinner {
            user_id: participant.user_id,
            score: participant.effective_score(),
            position: index as u32 + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use antepool_types::RoomId;
    use chrono::Utc;

    use super::*;

    fn participants(scores: &[Option<u64>]) -> Vec<Participant> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let mut p = Participant::new(RoomId(1), UserId(i as u64 + 1), Utc::now());
                p.score = *score;
                p
            })
            .collect()
    }

    #[test]
    fn test_all_zero_or_null_scores_yield_no_winners() {
        let ps = participants(&[None, Some(0), None, Some(0)]);
        assert!(resolve_winners(&ps, SplitRule::Top3).is_empty());
        assert!(resolve_winners(&ps, SplitRule::WinnerTakesAll).is_empty());
    }

    #[test]
    fn test_winner_count_capped_by_participants() {
        let ps = participants(&[Some(10), Some(20)]);
        let winners = resolve_winners(&ps, SplitRule::Top5);
        assert_eq!(winners.len(), 2);
    }

    #[test]
    fn test_positions_are_contiguous_and_descending_by_score() {
        let ps = participants(&[Some(800), Some(1500), Some(500), Some(1200)]);
        let winners = resolve_winners(&ps, SplitRule::Top3);

        assert_eq!(winners.len(), 3);
        assert_eq!(winners[0], RankedWinner { user_id: UserId(2), score: 1500, position: 1 });
        assert_eq!(winners[1], RankedWinner { user_id: UserId(4), score: 1200, position: 2 });
        assert_eq!(winners[2], RankedWinner { user_id: UserId(1), score: 800, position: 3 });
    }

    #[test]
    fn test_ties_keep_join_order() {
        let ps = participants(&[Some(100), Some(100), Some(100)]);
        let winners = resolve_winners(&ps, SplitRule::Top2);
        assert_eq!(winners[0].user_id, UserId(1));
        assert_eq!(winners[1].user_id, UserId(2));
    }

    #[test]
    fn test_zero_scorers_can_still_place_when_someone_scored() {
        // One real score unlocks ranking; trailing zeros may fill paid slots.
        let ps = participants(&[None, Some(50)]);
        let winners = resolve_winners(&ps, SplitRule::Top2);
        assert_eq!(winners[0].user_id, UserId(2));
        assert_eq!(winners[1].user_id, UserId(1));
        assert_eq!(winners[1].score, 0);
    }
}
