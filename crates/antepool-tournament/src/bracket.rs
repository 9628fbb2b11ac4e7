//! Bracket generation: participants + config → the full round ladder.

use antepool_types::{
    EliminationKind, MatchId, MatchStatus, RoomId, TournamentConfig, TournamentMatch, UserId,
    MATCH_SLOTS,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::TournamentError;

/// A freshly generated bracket: the round count plus every match row,
/// ordered by match number.
#[derive(Debug, Clone)]
pub struct Bracket {
    pub total_rounds: u32,
    pub matches: Vec<TournamentMatch>,
}

/// Builds the bracket for a tournament room.
///
/// Participants are shuffled uniformly with the supplied RNG (inject a
/// seeded one for deterministic pairings) and paired consecutively into
/// round-1 matches; an unpaired trailing participant gets a bye — a
/// single-occupant match created already completed, its player advancing
/// unopposed. Later rounds are materialized with empty slots; the match
/// lifecycle fills them with winner ids as feeding matches resolve.
///
/// The ladder halves (or quarters, for four-player matches) each round until
/// a single match remains, which makes the ladder length `ceil(log2(n))` for
/// head-to-head play. Double elimination doubles the round count; the extra
/// rounds are placeholder matches resolved by the winner's unopposed run.
///
/// `next_id` supplies match ids; `match_number` is assigned as a strictly
/// increasing sequence across rounds in creation order.
// TODO: route round losers into the doubled ladder's extra rounds instead of
// cascading byes, so double elimination grants a real second life.
pub fn generate_bracket<R: Rng>(
    room_id: RoomId,
    participants: &[UserId],
    config: &TournamentConfig,
    now: DateTime<Utc>,
    rng: &mut R,
    mut next_id: impl FnMut() -> MatchId,
) -> Result<Bracket, TournamentError> {
    validate_config(config)?;
    validate_field(config.elimination, participants.len())?;

    let per_match = config.players_per_match as usize;

    let mut seeded: Vec<UserId> = participants.to_vec();
    seeded.shuffle(rng);

    // Match counts per round: one winner per match feeds the next round.
    let mut round_sizes: Vec<usize> = Vec::new();
    let mut remaining = seeded.len();
    loop {
        let match_count = remaining.div_ceil(per_match);
        round_sizes.push(match_count);
        remaining = match_count;
        if match_count == 1 {
            break;
        }
    }
    let ladder_rounds = round_sizes.len() as u32;
    let total_rounds = match config.elimination {
        EliminationKind::Double => ladder_rounds * 2,
        EliminationKind::Single | EliminationKind::Swiss => ladder_rounds,
    };
    while (round_sizes.len() as u32) < total_rounds {
        round_sizes.push(1);
    }

    let mut matches: Vec<TournamentMatch> = Vec::new();
    let mut match_number = 0u32;
    for (round_index, &match_count) in round_sizes.iter().enumerate() {
        let round = round_index as u32 + 1;
        for index_in_round in 0..match_count {
            match_number += 1;
            let mut m = TournamentMatch {
                id: next_id(),
                room_id,
                round,
                match_number,
                players: [None; MATCH_SLOTS],
                winner: None,
                status: MatchStatus::Pending,
                time_limit_minutes: config.time_limit_minutes,
                started_at: None,
                completed_at: None,
                is_bye: false,
            };

            if round == 1 {
                let from = index_in_round * per_match;
                let to = (from + per_match).min(seeded.len());
                for (slot, user) in seeded[from..to].iter().enumerate() {
                    m.players[slot] = Some(*user);
                }
                if m.occupant_count() == 1 {
                    m.is_bye = true;
                    m.status = MatchStatus::Completed;
                    m.winner = m.players[0];
                    m.completed_at = Some(now);
                }
            }

            matches.push(m);
        }
    }

    Ok(Bracket { total_rounds, matches })
}

fn validate_config(config: &TournamentConfig) -> Result<(), TournamentError> {
    if !matches!(config.players_per_match, 2 | 4) {
        return Err(TournamentError::InvalidPlayersPerMatch(config.players_per_match));
    }
    if !(5..=120).contains(&config.time_limit_minutes) {
        return Err(TournamentError::TimeLimitOutOfRange(config.time_limit_minutes));
    }
    if !(10..=240).contains(&config.round_duration_minutes) {
        return Err(TournamentError::RoundDurationOutOfRange(config.round_duration_minutes));
    }
    Ok(())
}

fn validate_field(kind: EliminationKind, count: usize) -> Result<(), TournamentError> {
    let required = match kind {
        EliminationKind::Single => 2,
        EliminationKind::Double | EliminationKind::Swiss => 4,
    };
    if count < required {
        return Err(TournamentError::TooFewParticipants { kind, required, got: count });
    }
    // Swiss tolerates odd fields via byes.
    if matches!(kind, EliminationKind::Single | EliminationKind::Double) && count % 2 != 0 {
        return Err(TournamentError::OddParticipantCount(kind));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn users(n: u64) -> Vec<UserId> {
        (1..=n).map(UserId).collect()
    }

    fn generate(n: u64, kind: EliminationKind) -> Result<Bracket, TournamentError> {
        let config = TournamentConfig { elimination: kind, ..TournamentConfig::default() };
        let mut next = 0u64;
        generate_bracket(
            RoomId(1),
            &users(n),
            &config,
            Utc::now(),
            &mut StdRng::seed_from_u64(7),
            || {
                next += 1;
                MatchId(next)
            },
        )
    }

    #[test]
    fn test_eight_players_single_elimination() {
        let bracket = generate(8, EliminationKind::Single).unwrap();
        assert_eq!(bracket.total_rounds, 3);

        let round1: Vec<_> = bracket.matches.iter().filter(|m| m.round == 1).collect();
        assert_eq!(round1.len(), 4);
        assert!(round1.iter().all(|m| !m.is_bye), "even field has no byes");
        assert!(round1.iter().all(|m| m.occupant_count() == 2));

        // Later rounds are placeholders.
        let later: Vec<_> = bracket.matches.iter().filter(|m| m.round > 1).collect();
        assert_eq!(later.len(), 3);
        assert!(later.iter().all(|m| m.occupant_count() == 0));
        assert!(later.iter().all(|m| m.status == MatchStatus::Pending));
    }

    #[test]
    fn test_every_participant_in_exactly_one_round1_match() {
        let bracket = generate(8, EliminationKind::Single).unwrap();
        let mut seen: Vec<UserId> = bracket
            .matches
            .iter()
            .filter(|m| m.round == 1)
            .flat_map(|m| m.occupants().collect::<Vec<_>>())
            .collect();
        seen.sort();
        assert_eq!(seen, users(8));
    }

    #[test]
    fn test_odd_field_gets_exactly_one_bye() {
        let bracket = generate(5, EliminationKind::Swiss).unwrap();
        assert_eq!(bracket.total_rounds, 3);

        let round1: Vec<_> = bracket.matches.iter().filter(|m| m.round == 1).collect();
        assert_eq!(round1.len(), 3);

        let byes: Vec<_> = round1.iter().filter(|m| m.is_bye).collect();
        assert_eq!(byes.len(), 1);
        assert_eq!(byes[0].status, MatchStatus::Completed);
        assert_eq!(byes[0].winner, byes[0].players[0]);
        assert_eq!(round1.iter().filter(|m| !m.is_bye).count(), 2);
    }

    #[test]
    fn test_match_numbers_strictly_increase_across_rounds() {
        let bracket = generate(8, EliminationKind::Single).unwrap();
        let numbers: Vec<u32> = bracket.matches.iter().map(|m| m.match_number).collect();
        assert!(numbers.windows(2).all(|w| w[1] == w[0] + 1));
        let rounds: Vec<u32> = bracket.matches.iter().map(|m| m.round).collect();
        assert!(rounds.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_double_elimination_doubles_the_rounds() {
        let bracket = generate(8, EliminationKind::Double).unwrap();
        assert_eq!(bracket.total_rounds, 6);
    }

    #[test]
    fn test_seeded_rng_gives_deterministic_pairings() {
        let a = generate(8, EliminationKind::Single).unwrap();
        let b = generate(8, EliminationKind::Single).unwrap();
        for (x, y) in a.matches.iter().zip(b.matches.iter()) {
            assert_eq!(x.players, y.players);
        }
    }

    #[test]
    fn test_field_validation() {
        assert!(matches!(
            generate(1, EliminationKind::Single),
            Err(TournamentError::TooFewParticipants { required: 2, .. })
        ));
        assert!(matches!(
            generate(3, EliminationKind::Double),
            Err(TournamentError::TooFewParticipants { required: 4, .. })
        ));
        assert!(matches!(
            generate(5, EliminationKind::Single),
            Err(TournamentError::OddParticipantCount(EliminationKind::Single))
        ));
        assert!(matches!(
            generate(5, EliminationKind::Double),
            Err(TournamentError::OddParticipantCount(EliminationKind::Double))
        ));
        // Swiss tolerates odd.
        assert!(generate(5, EliminationKind::Swiss).is_ok());
    }

    #[test]
    fn test_config_validation() {
        let cases = [
            TournamentConfig { players_per_match: 3, ..TournamentConfig::default() },
            TournamentConfig { time_limit_minutes: 4, ..TournamentConfig::default() },
            TournamentConfig { time_limit_minutes: 121, ..TournamentConfig::default() },
            TournamentConfig { round_duration_minutes: 9, ..TournamentConfig::default() },
            TournamentConfig { round_duration_minutes: 241, ..TournamentConfig::default() },
        ];
        for config in cases {
            let mut next = 0u64;
            let result = generate_bracket(
                RoomId(1),
                &users(8),
                &config,
                Utc::now(),
                &mut StdRng::seed_from_u64(7),
                || {
                    next += 1;
                    MatchId(next)
                },
            );
            assert!(result.is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_four_player_matches_quarter_the_field() {
        let config = TournamentConfig {
            elimination: EliminationKind::Swiss,
            players_per_match: 4,
            ..TournamentConfig::default()
        };
        let mut next = 0u64;
        let bracket = generate_bracket(
            RoomId(1),
            &users(16),
            &config,
            Utc::now(),
            &mut StdRng::seed_from_u64(7),
            || {
                next += 1;
                MatchId(next)
            },
        )
        .unwrap();

        // 16 → 4 matches → 4 winners → 1 match.
        assert_eq!(bracket.total_rounds, 2);
        assert_eq!(bracket.matches.iter().filter(|m| m.round == 1).count(), 4);
        assert_eq!(bracket.matches.iter().filter(|m| m.round == 2).count(), 1);
    }
}
