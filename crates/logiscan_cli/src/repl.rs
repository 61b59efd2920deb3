use logiscan_engine::{Analyzer, Domain, NotationTables};
use rustyline::error::ReadlineError;

use crate::completer::LogiscanHelper;
use crate::config::LogiscanConfig;
use crate::format::{format_analysis, format_classification};

const HELP: &str = "\
Enter a formula to analyze it over the current domain, e.g.
  x > 0 and x < 5
  ∀x: x*x ≥ 0
  exists t. sin(t) > 0.5

Commands:
  :domain                 show the current domain
  :domain <min> <max> <step>
                          set the domain
  :normalize <formula>    show the normalized formula
  :classify <formula>     show predicate and quantifier info
  :help                   this text
  :quit                   leave";

/// Outcome of one REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Error(String),
    Quit,
}

pub struct Repl {
    analyzer: Analyzer<'static>,
    domain: Domain,
}

impl Repl {
    pub fn new(config: &LogiscanConfig) -> Self {
        Self {
            analyzer: Analyzer::new(NotationTables::shared(), config.analyzer_options()),
            domain: config.domain(None, None, None),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("logiscan: formula analysis over {}", self.domain());
        println!("Type :help for commands.");

        let config = rustyline::Config::builder()
            .max_history_size(100)?
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut rl =
            rustyline::Editor::<LogiscanHelper, rustyline::history::DefaultHistory>::with_config(
                config,
            )?;
        rl.set_helper(Some(LogiscanHelper::new()));

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line)?;

                    match self.handle_line(line) {
                        Reply::Output(text) => println!("{}", text),
                        Reply::Error(text) => println!("Error: {}", text),
                        Reply::Quit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return self.analyze(line);
        };

        let (command, arg) = match rest.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (rest, ""),
        };
        match command {
            "quit" | "q" | "exit" => Reply::Quit,
            "help" | "h" => Reply::Output(HELP.to_string()),
            "domain" => self.set_domain(arg),
            "normalize" => Reply::Output(self.analyzer.normalizer().normalize(arg)),
            "classify" => {
                let classification = self.analyzer.classifier().classify(arg);
                Reply::Output(format_classification(&classification))
            }
            other => Reply::Error(format!("unknown command `:{}` (try :help)", other)),
        }
    }

    fn analyze(&self, formula: &str) -> Reply {
        match self.analyzer.analyze_domain(formula, self.domain) {
            Ok(analysis) => Reply::Output(format_analysis(&analysis)),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn set_domain(&mut self, arg: &str) -> Reply {
        if arg.is_empty() {
            return Reply::Output(format!("Domain {}", self.domain));
        }

        let parts: Vec<&str> = arg.split_whitespace().collect();
        if parts.len() != 3 {
            return Reply::Error("usage: :domain <min> <max> <step>".to_string());
        }
        let parsed: Result<Vec<f64>, _> = parts.iter().map(|s| s.parse::<f64>()).collect();
        let values = match parsed {
            Ok(v) => v,
            Err(e) => return Reply::Error(format!("invalid number: {}", e)),
        };

        let domain = Domain::new(values[0], values[1], values[2]);
        if let Err(e) = self.analyzer.validate_domain(&domain) {
            return Reply::Error(e.to_string());
        }
        self.domain = domain;
        tracing::debug!(%domain, "domain set");
        Reply::Output(format!("Domain {}", domain))
    }
}
