//! Turn engine integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use rust_ludo::core::{DiceSequence, EpisodeConfig, LudoError, SideId, TokenId};
use rust_ludo::engine::{
    Conversation, Episode, EpisodeEvent, EpisodeStatus, EventRecord, EventSink, InteractiveSide,
    ModelSide, NullSink, Role, ScriptedSide, SearchSide, Side, Transcript,
};
use rust_ludo::oracle::MinimaxConfig;
use rust_ludo::rules::Violation;

fn boxed<S: Side + 'static>(side: S) -> Box<dyn Side> {
    Box::new(side)
}

/// Sink that counts how often each side was prompted.
#[derive(Default)]
struct PromptCounter {
    prompts: [usize; 2],
}

impl EventSink for PromptCounter {
    fn record(&mut self, record: &EventRecord) {
        if let (EpisodeEvent::SendMessage { .. }, Some(side)) = (&record.event, record.side) {
            self.prompts[side.index()] += 1;
        }
    }
}

// =============================================================================
// Reprompt protocol
// =============================================================================

#[test]
fn test_staying_home_on_six_is_corrected() {
    let dice = DiceSequence::single(vec![6, 5, 3]).unwrap();
    let side = ScriptedSide::new(["MY MOVE: X -> 0", "MY MOVE: X -> 1", "MY MOVE: X -> 6", "MY MOVE: X -> 9"]);
    let episode = Episode::new(EpisodeConfig::default(), 23, 1, dice, vec![boxed(side)]).unwrap();

    let report = episode.run_with(&mut NullSink).unwrap();
    assert_eq!(report.status, EpisodeStatus::Draw);
    assert_eq!(report.rule_errors, 1);

    let first_error = report.transcript.iter().find_map(|r| match r.event {
        EpisodeEvent::Error { violation } => Some((r.turn, violation)),
        _ => None,
    });
    assert_eq!(first_error, Some((0, Violation::NotMovedToBoard(TokenId('X')))));

    let correction = report.transcript.iter().find_map(|r| match &r.event {
        EpisodeEvent::SendMessage { content } if content.starts_with("INVALID MOVE") => {
            Some(content.clone())
        }
        _ => None,
    });
    assert_eq!(
        correction.as_deref(),
        Some("INVALID MOVE: Token X can be played to the board but wasn't. Please try again.")
    );
}

#[test]
fn test_budget_exhaustion_stops_the_round() {
    let dice = DiceSequence::paired(vec![[6, 6], [1, 1]]).unwrap();
    let sides = vec![
        boxed(ScriptedSide::new(["?", "??", "???"])),
        boxed(ScriptedSide::new(["MY MOVE: A -> 1"])),
    ];
    let episode = Episode::new(EpisodeConfig::default(), 10, 1, dice, sides).unwrap();

    let mut counter = PromptCounter::default();
    let report = episode.run_with(&mut counter).unwrap();

    assert_eq!(report.status, EpisodeStatus::Aborted);
    assert_eq!(report.parse_errors, 3);
    // Turn message plus two corrections, and nothing for the second side.
    assert_eq!(counter.prompts, [3, 0]);
}

#[test]
fn test_custom_attempt_limit() {
    let dice = DiceSequence::single(vec![6]).unwrap();
    let side = ScriptedSide::new(vec!["no"; 5]);
    let config = EpisodeConfig::default().with_attempt_limit(5);
    let report = Episode::new(config, 10, 1, dice, vec![boxed(side)])
        .unwrap()
        .run_with(&mut NullSink)
        .unwrap();
    assert_eq!(report.status, EpisodeStatus::Aborted);
    assert_eq!(report.reprompt_attempts, 4);
}

// =============================================================================
// Termination and statuses
// =============================================================================

#[test]
fn test_search_sides_terminate_within_sequence() {
    for seed in 0..4u8 {
        let rolls: Vec<[u8; 2]> = (0..12u8)
            .map(|i| [(i * 5 + seed) % 6 + 1, (i * 7 + seed * 3) % 6 + 1])
            .collect();
        let dice = DiceSequence::paired(rolls).unwrap();
        let sides = vec![
            boxed(SearchSide::new(&dice, 10, MinimaxConfig::default()).unwrap()),
            boxed(SearchSide::new(&dice, 10, MinimaxConfig::default()).unwrap()),
        ];
        let report = Episode::new(EpisodeConfig::default(), 10, 2, dice.clone(), sides)
            .unwrap()
            .run_with(&mut NullSink)
            .unwrap();

        assert!(report.status.is_terminal());
        assert_ne!(report.status, EpisodeStatus::Aborted);
        assert!(report.turns_played <= dice.len());
        assert_eq!(report.errors(), 0);
    }
}

#[test]
fn test_win_is_reported_for_primary() {
    let dice = DiceSequence::paired(vec![[6, 1], [4, 1], [1, 1]]).unwrap();
    let sides = vec![
        boxed(ScriptedSide::new(["MY MOVE: X -> 1", "MY MOVE: X -> 5"])),
        boxed(ScriptedSide::new(["MY MOVE: A -> 0", "MY MOVE: A -> 0"])),
    ];
    let report = Episode::new(EpisodeConfig::default(), 5, 1, dice, sides)
        .unwrap()
        .run_with(&mut NullSink)
        .unwrap();
    assert_eq!(report.status, EpisodeStatus::Win);
    assert_eq!(report.turns_played, 2);
    assert_eq!(report.board.render(), "□ □ □ □ X");
}

#[test]
fn test_no_captures_in_live_play() {
    // A lands on X's field; X stays put.
    let dice = DiceSequence::paired(vec![[6, 6], [2, 1], [1, 1]]).unwrap();
    let sides = vec![
        boxed(ScriptedSide::new(["MY MOVE: X -> 1", "MY MOVE: X -> 3"])),
        boxed(ScriptedSide::new(["MY MOVE: A -> 1", "MY MOVE: A -> 2"])),
    ];
    let mut episode = Episode::new(EpisodeConfig::default(), 10, 1, dice, sides).unwrap();
    episode.play_turn(&mut NullSink).unwrap();

    assert_eq!(episode.board().positions(SideId::PRIMARY).get(TokenId('X')), Some(1));
    assert_eq!(episode.board().positions(SideId::new(1)).get(TokenId('A')), Some(1));
}

// =============================================================================
// Side variants
// =============================================================================

#[test]
fn test_model_side_gets_growing_conversation() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let model = ModelSide::new(move |conversation: &Conversation, turn| {
        log.borrow_mut().push(conversation.len());
        Ok(if turn == 0 { "MY MOVE: X -> 1".to_string() } else { "MY MOVE: X -> 3".to_string() })
    });

    let dice = DiceSequence::single(vec![6, 2]).unwrap();
    let mut episode = Episode::new(EpisodeConfig::default(), 10, 1, dice, vec![boxed(model)]).unwrap();
    episode.play_turn(&mut NullSink).unwrap();
    episode.play_turn(&mut NullSink).unwrap();

    // System + task/turn; then system, task/turn, assistant, turn.
    assert_eq!(*seen.borrow(), vec![2, 4]);
    let conversation = episode.conversation(SideId::PRIMARY).unwrap();
    assert_eq!(conversation.messages()[0].role, Role::System);
    assert_eq!(conversation.last().map(|m| m.role), Some(Role::Assistant));
}

#[test]
fn test_interactive_side_plays_from_input() {
    let input = "X -> 1\nMY MOVE: X -> 4\n".as_bytes();
    let side = InteractiveSide::new(input, std::io::sink());
    let dice = DiceSequence::single(vec![6, 3]).unwrap();
    let report = Episode::new(EpisodeConfig::default(), 10, 1, dice, vec![boxed(side)])
        .unwrap()
        .run_with(&mut NullSink)
        .unwrap();
    assert_eq!(report.accepted_moves, 2);
    assert_eq!(report.board.positions(SideId::PRIMARY).get(TokenId('X')), Some(4));
}

#[test]
fn test_side_io_fault_propagates() {
    let side = InteractiveSide::new("".as_bytes(), std::io::sink());
    let dice = DiceSequence::single(vec![6]).unwrap();
    let result = Episode::new(EpisodeConfig::default(), 10, 1, dice, vec![boxed(side)])
        .unwrap()
        .run_with(&mut NullSink);
    assert!(matches!(result, Err(LudoError::EndOfInput)));
}

// =============================================================================
// Transcript
// =============================================================================

#[test]
fn test_transcript_order_and_round_trip() {
    let dice = DiceSequence::single(vec![6, 2]).unwrap();
    let side = ScriptedSide::new(["MY MOVE: X -> 1", "MY MOVE: X -> 3"]);
    let mut external = Transcript::new();
    let report = Episode::new(EpisodeConfig::default(), 10, 1, dice, vec![boxed(side)])
        .unwrap()
        .run_with(&mut external)
        .unwrap();

    assert_eq!(external, report.transcript);
    let names: Vec<_> = report.transcript.for_turn(0).map(|r| r.event.name()).collect();
    assert_eq!(
        names,
        vec!["metadata", "current state", "send message", "get message", "parse", "accepted move"]
    );
    assert!(matches!(
        report.transcript.iter().last().map(|r| &r.event),
        Some(EpisodeEvent::Status { status: EpisodeStatus::Draw })
    ));

    let restored = Transcript::from_bytes(&report.transcript.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, report.transcript);
}
