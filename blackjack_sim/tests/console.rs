use blackjack_lib::prelude::*;
use blackjack_sim::ConsoleSession;
use Card::*;

/// Session whose shoe deals `draws` in order, then nines.
fn stacked(draws: &[Card], bankroll: u32) -> GameSession {
    let mut cards = vec![Nine; 40];
    cards.extend(draws.iter().rev());
    let config = GameConfig::new()
        .starting_bankroll(bankroll)
        .build()
        .unwrap();
    GameSession::with_shoe(config, Shoe::from_cards(6, cards, 7)).unwrap()
}

fn play(session: GameSession, input: &str) -> (u32, String) {
    let mut output = Vec::new();
    let bankroll = ConsoleSession::new(session, input.as_bytes(), &mut output)
        .run()
        .unwrap();
    (bankroll, String::from_utf8(output).unwrap())
}

#[test]
fn bad_bets_are_reprompted_and_a_loss_is_reported() {
    let session = stacked(&[Ten, Seven, Six, Five, Ten], 1000);
    let (bankroll, out) = play(session, "abc\n5\n100\ns\nn\n");

    assert_eq!(bankroll, 900);
    assert!(out.starts_with("--- Welcome to Blackjack! ---"));
    assert!(out.contains("Bankroll: $1000 | Enter bet (10-1000): "));
    assert!(out.contains("Numbers only!"));
    assert!(out.contains("Invalid bet! Enter between 10-1000"));
    assert!(out.contains("Dealer shows: 6"));
    assert!(out.contains("Running Count: 1"));
    assert!(out.contains("True Count: 1.27"));
    assert!(out.contains("Your hand: [10, 7] (17)"));
    assert!(out.contains("[H]it, [S]tand, [D]ouble: "));
    assert!(!out.contains("s[P]lit"));
    assert!(out.contains("Dealer's hand: [6, 5, 10] (21)"));
    assert!(out.contains("Hand [10, 7] LOST $100"));
    assert!(out.contains("Play again? (y/n): "));
    assert!(out.ends_with("Thanks for playing! Final bankroll: $900\n"));
}

#[test]
fn invalid_actions_are_reprompted() {
    let session = stacked(&[Ten, Six, Ten, Seven, Two], 1000);
    let (bankroll, out) = play(session, "100\nx\np\nh\ns\nn\n");

    assert_eq!(bankroll, 1100);
    assert_eq!(out.matches("Invalid action!").count(), 2);
    assert!(out.contains("Your hand: [10, 6, 2] (18)"));
    assert!(out.contains("[H]it, [S]tand: "));
    assert!(out.contains("Hand [10, 6, 2] WON $100"));
}

#[test]
fn soft_totals_are_shown() {
    let session = stacked(&[Ace, Six, Ten, Eight], 1000);
    let (_, out) = play(session, "10\ns\nn\n");
    assert!(out.contains("Your hand: [A, 6] (soft 17)"));
    assert!(out.contains("Hand [A, 6] LOST $10"));
}

#[test]
fn natural_skips_the_decision_prompt() {
    let session = stacked(&[Ace, King, Nine, Seven], 1000);
    let (bankroll, out) = play(session, "10\nn\n");

    assert_eq!(bankroll, 1015);
    assert!(out.contains("Dealer shows: 9"));
    assert!(!out.contains("[H]it"));
    assert!(out.contains("BLACKJACK! Won $15"));
}

#[test]
fn split_hands_are_played_in_turn() {
    let session = stacked(&[Eight, Eight, Ten, Seven, Three, Ten], 1000);
    let (bankroll, out) = play(session, "100\np\ns\ns\nn\n");

    assert!(out.contains("[H]it, [S]tand, [D]ouble, s[P]lit: "));
    assert!(out.contains("Hand 1: [8, 3] (11)"));
    assert!(out.contains("Hand 2: [8, 10] (18)"));
    assert!(out.contains("Hand [8, 3] LOST $50"));
    assert!(out.contains("Hand [8, 10] WON $50"));
    assert_eq!(bankroll, 900);
}

#[test]
fn going_broke_ends_the_game() {
    let session = stacked(&[Ten, Seven, Ten, Nine], 10);
    let (bankroll, out) = play(session, "10\ns\n");

    assert_eq!(bankroll, 0);
    assert!(out.contains("Hand [10, 7] LOST $10"));
    assert!(!out.contains("Play again?"));
    assert!(out.ends_with("You're broke! Game over.\n"));
    assert!(!out.contains("Thanks for playing!"));
}

#[test]
fn broke_player_is_not_asked_to_play_again() {
    let session = stacked(&[Ten, Seven, Ten, Nine], 10);
    let (bankroll, out) = play(session, "10\ns\nn\n");

    assert_eq!(bankroll, 0);
    assert_eq!(out.matches("Bankroll:").count(), 1);
    assert!(!out.contains("Play again?"));
    assert!(out.ends_with("You're broke! Game over.\n"));
}

#[test]
fn end_of_input_stands_and_quits() {
    let session = stacked(&[Ten, Nine, Ten, Eight], 1000);
    let (bankroll, out) = play(session, "50\n");

    assert_eq!(bankroll, 1050);
    assert!(out.contains("Hand [10, 9] WON $50"));
    assert!(!out.contains("Play again?"));
    assert!(out.ends_with("Thanks for playing! Final bankroll: $1050\n"));
}

#[test]
fn end_of_input_at_the_bet_prompt_quits() {
    let session = stacked(&[], 1000);
    let (bankroll, out) = play(session, "");
    assert_eq!(bankroll, 1000);
    assert!(out.ends_with("Thanks for playing! Final bankroll: $1000\n"));
}
