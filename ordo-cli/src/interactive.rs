/// Terminal question-and-answer loop driving a `RankingSession`.
///
/// Generic over the reader and writer so tests can script a whole session
/// with an in-memory buffer. Every function returns `Ok(None)` / `Ok(false)`
/// when input runs out before the question is answered.
use std::io::{self, BufRead, Write};

use ordo_core::{CurveKind, FitOptions, RankingSession, ValuationError, ValueRow};
use tracing::debug;

use crate::items::Item;

/// One answer to "which do you prefer?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Left,
    Right,
    Skip,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Next trimmed line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, msg: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{msg}")
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask for a non-negative number until one is given.
    pub fn ask_price(&mut self, question: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match answer.parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => return Ok(Some(p)),
                _ => self.say(format!("  \"{answer}\" is not a valid price, enter a number >= 0."))?,
            }
        }
    }

    pub fn ask_choice(&mut self, left: &str, right: &str, remaining: usize) -> io::Result<Option<Answer>> {
        self.say("")?;
        self.say("Which do you prefer?")?;
        self.say(format!("  [1] {left}"))?;
        self.say(format!("  [2] {right}"))?;
        self.say("  [s] skip for now")?;
        self.say(format!("Remaining comparisons (at most) after this: {remaining}"))?;
        loop {
            let Some(answer) = self.ask(">")? else {
                return Ok(None);
            };
            match answer.to_ascii_lowercase().as_str() {
                "1" | "l" | "left" => return Ok(Some(Answer::Left)),
                "2" | "r" | "right" => return Ok(Some(Answer::Right)),
                "s" | "skip" => return Ok(Some(Answer::Skip)),
                _ => self.say("  Please answer 1, 2 or s.")?,
            }
        }
    }

    pub fn ask_curve(&mut self) -> io::Result<Option<CurveKind>> {
        self.say("")?;
        self.say("Select a distribution for your value curve:")?;
        self.say("  [l] linear       \"Everything is similar to everything in this pool\"")?;
        self.say("  [e] exponential  \"I think there is a long and expensive right tail\"")?;
        loop {
            let Some(answer) = self.ask(">")? else {
                return Ok(None);
            };
            match answer.parse::<CurveKind>() {
                Ok(kind) => return Ok(Some(kind)),
                Err(e) => self.say(format!("  {e}"))?,
            }
        }
    }

    pub fn notice(&mut self, msg: impl std::fmt::Display) -> io::Result<()> {
        self.say(msg)
    }
}

/// Ask for the listed price of every item whose spec didn't carry one.
pub fn fill_missing_prices<R: BufRead, W: Write>(
    items: &mut [Item],
    prompter: &mut Prompter<R, W>,
) -> io::Result<bool> {
    for item in items.iter_mut().filter(|i| i.price.is_none()) {
        let question = format!("Enter the listed price of \"{}\":", item.title);
        let Some(price) = prompter.ask_price(&question)? else {
            return Ok(false);
        };
        item.price = Some(price.round() as u64);
    }
    Ok(true)
}

fn describe(item: &Item) -> String {
    match item.price {
        Some(p) => format!("{} (listed at {})", item.title, p),
        None => item.title.clone(),
    }
}

/// Present pairs until the session is complete.
pub fn run_comparisons<R: BufRead, W: Write>(
    session: &mut RankingSession,
    items: &[Item],
    prompter: &mut Prompter<R, W>,
) -> io::Result<bool> {
    while let Some(pair) = session.current_pair() {
        let left = describe(&items[pair.low()]);
        let right = describe(&items[pair.high()]);
        let Some(answer) = prompter.ask_choice(&left, &right, session.remaining_after_current())? else {
            return Ok(false);
        };
        let decision = match answer {
            Answer::Left => session.choose(pair.low()),
            Answer::Right => session.choose(pair.high()),
            Answer::Skip => session.skip(),
        };
        debug!(?pair, ?decision, "Answer applied");
    }
    Ok(true)
}

/// Settle on a curve: the preset if it fits, otherwise ask.
pub fn choose_curve<R: BufRead, W: Write>(
    session: &mut RankingSession,
    preset: Option<CurveKind>,
    prompter: &mut Prompter<R, W>,
) -> io::Result<bool> {
    if let Some(kind) = preset {
        match session.select_curve(kind) {
            Ok(()) => return Ok(true),
            Err(e) => prompter.notice(format!("  {e}"))?,
        }
    }
    loop {
        let Some(kind) = prompter.ask_curve()? else {
            return Ok(false);
        };
        match session.select_curve(kind) {
            Ok(()) => return Ok(true),
            Err(e) => prompter.notice(format!("  {e}"))?,
        }
    }
}

/// Ask what the user would pay for the anchor items and fit the curve,
/// re-asking until the prices are usable. Returns the accepted anchor prices
/// along with the table.
pub fn ask_value_table<R: BufRead, W: Write>(
    session: &RankingSession,
    items: &[Item],
    options: &FitOptions,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<(Vec<f64>, Vec<ValueRow>)>> {
    let Some(kind) = session.curve() else {
        return Ok(None);
    };
    let Some(ranking) = session.ranking() else {
        return Ok(None);
    };
    let listed: Vec<f64> = items.iter().map(Item::listed_price).collect();

    loop {
        let mut anchors = Vec::with_capacity(kind.anchor_count());
        for position in kind.anchor_positions(ranking.len()) {
            let item = &items[ranking[position]];
            let question = format!(
                "What would you pay for \"{}\" (preference #{})?",
                item.title, position
            );
            let Some(price) = prompter.ask_price(&question)? else {
                return Ok(None);
            };
            anchors.push(price);
        }

        match session.value_table(&listed, &anchors, options) {
            Ok(rows) => return Ok(Some((anchors, rows))),
            Err(e @ ValuationError::PricesNotDescending) => {
                prompter.notice(format!("  Error: {e}. Please re-enter your pricing."))?;
            }
            Err(e) => {
                prompter.notice(format!("  Error: {e}. Please try different prices."))?;
            }
        }
    }
}
