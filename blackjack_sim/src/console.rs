//! Interactive play over any line based input and output, normally stdin and stdout.

use crate::SimulationError;
use blackjack_lib::{
    format_cards, Action, BlackjackGameError, DecisionContext, DecisionMaker, GameSession, Hand,
    HandResult, RoundOutcome,
};
use std::io::{self, BufRead, Write};

/// Writes `text`, flushes, and reads one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::Hit => "[H]it",
        Action::Stand => "[S]tand",
        Action::Double => "[D]ouble",
        Action::Split => "s[P]lit",
    }
}

fn parse_action(line: &str) -> Option<Action> {
    match line.to_ascii_lowercase().as_str() {
        "h" | "hit" => Some(Action::Hit),
        "s" | "stand" => Some(Action::Stand),
        "d" | "double" => Some(Action::Double),
        "p" | "split" => Some(Action::Split),
        _ => None,
    }
}

fn describe(hand: &Hand) -> String {
    if hand.is_soft() {
        format!("{} (soft {})", format_cards(&hand.cards), hand.value())
    } else {
        format!("{} ({})", format_cards(&hand.cards), hand.value())
    }
}

/// Asks the player for each decision. End of input stands on every remaining hand.
struct ConsoleDecider<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    announced: bool,
    eof: bool,
    error: Option<io::Error>,
}

impl<'a, R: BufRead, W: Write> ConsoleDecider<'a, R, W> {
    fn new(input: &'a mut R, output: &'a mut W) -> Self {
        ConsoleDecider {
            input,
            output,
            announced: false,
            eof: false,
            error: None,
        }
    }

    fn ask(&mut self, context: &DecisionContext<'_>) -> io::Result<Option<Action>> {
        if !self.announced {
            self.announced = true;
            writeln!(self.output, "\nDealer shows: {}", context.dealer_up_card)?;
            writeln!(self.output, "Running Count: {}", context.running_count)?;
            writeln!(self.output, "True Count: {:.2}", context.true_count)?;
        }
        if context.hand.from_split {
            writeln!(
                self.output,
                "\nHand {}: {}",
                context.hand_index + 1,
                describe(context.hand)
            )?;
        } else {
            writeln!(self.output, "\nYour hand: {}", describe(context.hand))?;
        }

        let menu = context
            .legal_actions
            .iter()
            .map(|a| action_label(*a))
            .collect::<Vec<&str>>()
            .join(", ");
        loop {
            let Some(line) = prompt(self.input, self.output, &format!("{}: ", menu))? else {
                return Ok(None);
            };
            match parse_action(&line) {
                Some(action) if context.allows(action) => return Ok(Some(action)),
                _ => writeln!(self.output, "Invalid action!")?,
            }
        }
    }
}

impl<'a, R: BufRead, W: Write> DecisionMaker for ConsoleDecider<'a, R, W> {
    fn decide(&mut self, context: &DecisionContext<'_>) -> Action {
        if self.eof || self.error.is_some() {
            return Action::Stand;
        }
        match self.ask(context) {
            Ok(Some(action)) => action,
            Ok(None) => {
                self.eof = true;
                Action::Stand
            }
            Err(e) => {
                self.error = Some(e);
                Action::Stand
            }
        }
    }

    fn rejected(&mut self, action: Action, error: &BlackjackGameError) {
        log::debug!("{} rejected: {}", action, error);
        if let Err(e) = writeln!(self.output, "Invalid action!") {
            self.error.get_or_insert(e);
        }
    }
}

/// The console game: takes bets, asks for decisions and reports every round until the player
/// quits, runs out of money or the input ends.
pub struct ConsoleSession<R, W> {
    session: GameSession,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleSession<R, W> {
    pub fn new(session: GameSession, input: R, output: W) -> Self {
        ConsoleSession {
            session,
            input,
            output,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Plays until the player stops. Returns the final bankroll.
    pub fn run(&mut self) -> Result<u32, SimulationError> {
        writeln!(self.output, "--- Welcome to Blackjack! ---")?;
        loop {
            let Some(bet) = self.read_bet()? else {
                break;
            };

            let mut decider = ConsoleDecider::new(&mut self.input, &mut self.output);
            let outcome = self.session.play_round(bet, &mut decider)?;
            let ConsoleDecider {
                announced,
                eof,
                error,
                ..
            } = decider;
            if let Some(e) = error {
                return Err(e.into());
            }

            if !announced {
                if let Some(card) = outcome.dealer_cards.first() {
                    writeln!(self.output, "\nDealer shows: {}", card)?;
                }
            }
            if outcome.reshuffled {
                writeln!(self.output, "\n--- Reshuffling deck ---")?;
            }
            self.report(&outcome)?;
            if !self.session.can_continue() {
                writeln!(self.output, "\nYou're broke! Game over.")?;
                return Ok(self.session.bankroll());
            }
            if eof {
                break;
            }

            match prompt(&mut self.input, &mut self.output, "\nPlay again? (y/n): ")? {
                Some(answer) if answer.eq_ignore_ascii_case("y") => {}
                _ => break,
            }
        }
        writeln!(
            self.output,
            "\nThanks for playing! Final bankroll: ${}",
            self.session.bankroll()
        )?;
        Ok(self.session.bankroll())
    }

    /// Prompts until a bet within the table limits is entered. `None` at end of input.
    fn read_bet(&mut self) -> io::Result<Option<u32>> {
        let min = self.session.min_bet();
        let bankroll = self.session.bankroll();
        let text = format!("\nBankroll: ${} | Enter bet ({}-{}): ", bankroll, min, bankroll);
        loop {
            let Some(line) = prompt(&mut self.input, &mut self.output, &text)? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Err(_) => writeln!(self.output, "Numbers only!")?,
                Ok(bet) if bet < min as i64 || bet > bankroll as i64 => {
                    writeln!(self.output, "Invalid bet! Enter between {}-{}", min, bankroll)?
                }
                Ok(bet) => return Ok(Some(bet as u32)),
            }
        }
    }

    fn report(&mut self, outcome: &RoundOutcome) -> io::Result<()> {
        writeln!(
            self.output,
            "\nDealer's hand: {} ({})",
            format_cards(&outcome.dealer_cards),
            outcome.dealer_value
        )?;
        for hand in &outcome.hands {
            let cards = format_cards(&hand.cards);
            match hand.result {
                HandResult::Bust => {
                    writeln!(self.output, "Hand {} BUST - Lost ${}", cards, hand.stake)?
                }
                HandResult::Blackjack => writeln!(self.output, "BLACKJACK! Won ${}", hand.net())?,
                HandResult::Win => writeln!(self.output, "Hand {} WON ${}", cards, hand.net())?,
                HandResult::Push => writeln!(self.output, "Hand {} PUSH", cards)?,
                HandResult::Loss => writeln!(self.output, "Hand {} LOST ${}", cards, hand.stake)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_case_insensitively() {
        assert_eq!(parse_action("H"), Some(Action::Hit));
        assert_eq!(parse_action("stand"), Some(Action::Stand));
        assert_eq!(parse_action("d"), Some(Action::Double));
        assert_eq!(parse_action("P"), Some(Action::Split));
        assert_eq!(parse_action("x"), None);
        assert_eq!(parse_action(""), None);
    }

    #[test]
    fn menu_labels() {
        let menu = [Action::Hit, Action::Stand, Action::Double, Action::Split]
            .iter()
            .map(|a| action_label(*a))
            .collect::<Vec<&str>>()
            .join(", ");
        assert_eq!(menu, "[H]it, [S]tand, [D]ouble, s[P]lit");
    }

    #[test]
    fn prompt_reports_end_of_input() {
        let mut input: &[u8] = b" 25 \n";
        let mut output = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut output, "> ").unwrap(),
            Some("25".to_string())
        );
        assert_eq!(prompt(&mut input, &mut output, "> ").unwrap(), None);
        assert_eq!(output, b"> > ");
    }
}
