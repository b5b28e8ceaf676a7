//! Line-oriented controller for interactive tableau proofs.
//!
//! Reads commands from stdin, one per line; run `help` for the list.
//! Set `RUST_LOG=debug` to trace rule applications and closures.
use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;
use tableau::{
    lang::{render_error, PrettyPrint},
    prover::{
        generate_graphviz_dot, render_outline, NodeId, ProofSession, ProverError, RuleKind,
    },
};

const HELP: &str = "\
commands:
  new <formula>                    start proving <formula>
  show                             print the proof tree
  dot                              print the proof tree in Graphviz DOT
  goals                            list open goals
  rules <node>                     list rules applicable at <node>
  apply <rule> <goal> [<source>]   expand <source> (default: nearest formula) at <goal>
  close <node> <node> [<subst>]    close below two complementary nodes, e.g. `close 3 5 X_1/a`
  help                             show this message
  quit                             leave";

#[derive(Default)]
struct Repl {
    session: Option<ProofSession>,
}

/// Split off the first whitespace-separated word.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn parse_node(word: &str) -> Result<NodeId> {
    if word.is_empty() {
        bail!("missing node id");
    }
    NodeId::from_str(word).with_context(|| format!("invalid node id `{}`", word))
}

/// Report input errors against the text they came from.
fn explain(err: ProverError, source: &str, origin: &str) -> anyhow::Error {
    match err {
        ProverError::Lang(e) => anyhow!(render_error(source, Some(origin), &e)),
        other => anyhow!("{} ({})", other, other.category()),
    }
}

impl Repl {
    fn session(&mut self) -> Result<&mut ProofSession> {
        self.session
            .as_mut()
            .ok_or_else(|| anyhow!("no proof in progress, start one with `new <formula>`"))
    }

    /// Run one command. `None` means quit.
    fn execute(&mut self, line: &str) -> Result<Option<String>> {
        let (command, rest) = next_word(line);
        log::debug!("command `{}` `{}`", command, rest);
        let reply = match command {
            "" => String::new(),
            "help" => HELP.to_string(),
            "quit" | "exit" => return Ok(None),
            "new" => {
                let session =
                    ProofSession::start(rest).map_err(|e| explain(e, rest, "<formula>"))?;
                let outline = render_outline(session.tree());
                self.session = Some(session);
                outline
            }
            "show" => {
                let session = self.session()?;
                let status = if session.is_proved() {
                    "proved".to_string()
                } else {
                    format!("{} open goal(s)", session.open_goals().len())
                };
                format!("{}{}", render_outline(session.tree()), status)
            }
            "dot" => generate_graphviz_dot(self.session()?.tree()),
            "goals" => {
                let session = self.session()?;
                let tree = session.tree();
                session
                    .open_goals()
                    .into_iter()
                    .map(|goal| match tree.nearest_formula(goal) {
                        Some(id) => match tree[id].formula() {
                            Some(formula) => format!(
                                "{}: below {} {} {}",
                                goal,
                                id,
                                tree[id].sign(),
                                formula.to_source_string()
                            ),
                            None => goal.to_string(),
                        },
                        None => goal.to_string(),
                    })
                    .join("\n")
            }
            "rules" => {
                let node = parse_node(next_word(rest).0)?;
                let rules = self
                    .session()?
                    .applicable_rules(node)
                    .map_err(|e| explain(e, rest, "<node>"))?;
                if rules.is_empty() {
                    "no rule applies".to_string()
                } else {
                    rules.iter().join(", ")
                }
            }
            "apply" => {
                let (rule, rest) = next_word(rest);
                let rule = RuleKind::from_str(rule).map_err(|_| {
                    anyhow!("unknown rule `{}`, expected one of alpha, beta, gamma, delta", rule)
                })?;
                let (goal, rest) = next_word(rest);
                let goal = parse_node(goal)?;
                let (source, _) = next_word(rest);
                let session = self.session()?;
                let goals = if source.is_empty() {
                    session.apply_rule_nearest(rule, goal)
                } else {
                    session.apply_rule(rule, goal, parse_node(source)?)
                }
                .map_err(|e| explain(e, rest, "<source>"))?;
                format!("new goals: {}", goals.iter().join(", "))
            }
            "close" => {
                let (a, rest) = next_word(rest);
                let (b, substitution) = next_word(rest);
                let (a, b) = (parse_node(a)?, parse_node(b)?);
                let session = self.session()?;
                let closure = session
                    .close_goal(a, b, substitution)
                    .map_err(|e| explain(e, substitution, "<substitution>"))?;
                let mut reply = format!(
                    "closed goals {} below node {}",
                    closure.closed.iter().join(", "),
                    closure.ancestor
                );
                if session.is_proved() {
                    reply.push_str("\nproved");
                }
                reply
            }
            other => bail!("unknown command `{}`, try `help`", other),
        };
        Ok(Some(reply))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut repl = Repl::default();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match repl.execute(line.trim()) {
            Ok(None) => break,
            Ok(Some(reply)) if reply.is_empty() => {}
            Ok(Some(reply)) => writeln!(stdout, "{}", reply.trim_end())?,
            Err(err) => eprintln!("error: {:#}", err),
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
