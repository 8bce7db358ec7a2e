//! Instruction interpreter for banker_core sessions.
//!
//! This module provides a simple DSL for driving the deadlock-avoidance
//! simulator. Instructions follow the format:
//!
//! `ACTION arguments`
//!
//! where:
//! - ACTION := "CONFIG" | "PROCESS" | "REQUEST" | "RELEASE" | "CHECK" |
//!   "SEQUENCES" | "SCENARIO" | "STATE" | "STATS" | "RESET" | "HELP"
//! - quantity vectors are comma-separated integers, one component per
//!   resource type
//!
//! Examples:
//! - `CONFIG 3 10,8`
//! - `PROCESS 0 2,1 4,3`
//! - `REQUEST 0 1,0`
//! - `RELEASE 2 1,2`
//! - `SCENARIO deadlock`

use std::convert::TryFrom;

use banker_core::simulation::{
    api::{SimulationRequest, SimulationResponse, Statistics, SystemView},
    core::safety::SafetyReport,
    error::SimulationError,
    init_simulator,
    scenarios::Scenario,
    service::SimulationService,
};
use tower::Service;

/// Represents a command action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Nil,
    Config,
    Process,
    Request,
    Release,
    Check,
    Sequences,
    Scenario,
    State,
    Stats,
    Reset,
    Help,
}

impl Command {
    /// Parse a command from a string
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_uppercase().as_str() {
            "CONFIG" | "CFG" => Ok(Command::Config),
            "PROCESS" | "P" => Ok(Command::Process),
            "REQUEST" | "REQ" | "R" => Ok(Command::Request),
            "RELEASE" | "REL" | "L" => Ok(Command::Release),
            "CHECK" | "CK" => Ok(Command::Check),
            "SEQUENCES" | "SEQ" => Ok(Command::Sequences),
            "SCENARIO" | "SC" => Ok(Command::Scenario),
            "STATE" | "ST" => Ok(Command::State),
            "STATS" => Ok(Command::Stats),
            "RESET" => Ok(Command::Reset),
            "HELP" | "H" | "?" => Ok(Command::Help),
            _ => Err(anyhow::anyhow!("Unknown command: {}", s)),
        }
    }

    fn arity(&self) -> usize {
        match self {
            Command::Nil => 1,
            Command::Check => 1,
            Command::Sequences => 1,
            Command::State => 1,
            Command::Stats => 1,
            Command::Reset => 1,
            Command::Help => 1,
            Command::Scenario => 2,
            Command::Config => 3,
            Command::Request => 3,
            Command::Release => 3,
            Command::Process => 4,
        }
    }
}

/// Represents a complete instruction: ACTION OPERANDS
#[derive(Debug, Clone)]
pub struct Instruction {
    pub command: Command,
    pub operands: Operands,
}

#[derive(Debug, Clone, Default)]
pub enum Operands {
    /// Process count and total vector for CONFIG.
    Setup { processes: usize, total: Vec<i64> },
    /// Allocation and maximum rows for PROCESS.
    Row { process: usize, allocation: Vec<i64>, maximum: Vec<i64> },
    /// Per-resource amounts for REQUEST/RELEASE.
    Delta { process: usize, amounts: Vec<i64> },
    /// Preset name for SCENARIO.
    Preset(Scenario),
    #[default]
    None,
}

/// Parse a comma-separated quantity vector, e.g. `10,8,6`.
///
/// Negative components are accepted here; the core rejects them with a
/// distinguishable error so the denial can be reported per component.
fn parse_vector(s: &str) -> anyhow::Result<Vec<i64>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("Invalid quantity vector component: {}", part))
        })
        .collect()
}

fn parse_index(s: &str) -> anyhow::Result<usize> {
    s.parse::<usize>().map_err(|_| anyhow::anyhow!("Invalid process index: {}", s))
}

impl TryFrom<&str> for Instruction {
    type Error = anyhow::Error;

    /// Parse an instruction string in the format "ACTION operands"
    ///
    /// # Examples
    /// - `CONFIG 3 10,8`
    /// - `REQUEST 0 1,0`
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();

        // Skip empty lines and comments
        if s.is_empty() || s.starts_with('#') {
            return Ok(Instruction { command: Command::Nil, operands: Default::default() });
        }

        let parts: Vec<&str> = s.split_whitespace().collect();

        // Parse command
        let command = Command::parse(parts[0])?;
        if command.arity() != parts.len() {
            return Err(anyhow::anyhow!(
                "Invalid number of arguments for command: {}, expected {}, got {}",
                parts[0],
                command.arity(),
                parts.len()
            ));
        }

        let operands = match command {
            Command::Config => Operands::Setup {
                processes: parse_index(parts[1])?,
                total: parse_vector(parts[2])?,
            },
            Command::Process => Operands::Row {
                process: parse_index(parts[1])?,
                allocation: parse_vector(parts[2])?,
                maximum: parse_vector(parts[3])?,
            },
            Command::Request | Command::Release => Operands::Delta {
                process: parse_index(parts[1])?,
                amounts: parse_vector(parts[2])?,
            },
            Command::Scenario => Operands::Preset(
                parts[1].parse::<Scenario>().map_err(|e| anyhow::anyhow!("{}", e))?,
            ),
            _ => Operands::None,
        };

        Ok(Instruction { command, operands })
    }
}

impl TryFrom<String> for Instruction {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Instruction, anyhow::Error> {
        Instruction::try_from(s.as_str())
    }
}

fn format_sequence(sequence: &[usize]) -> String {
    sequence.iter().map(|i| format!("P{i}")).collect::<Vec<_>>().join(" -> ")
}

fn format_vector(v: &[u64]) -> String {
    format!("[{}]", v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", "))
}

/// Print a safety report as a step-by-step narration of the scan.
fn print_report(report: &SafetyReport) {
    for step in &report.trace {
        if step.eligible {
            println!(
                "  ✓ P{} can finish: need {} fits work {}; releases -> work {}",
                step.process,
                format_vector(&step.need),
                format_vector(&step.work),
                format_vector(step.work_after.as_deref().unwrap_or(&[])),
            );
        } else {
            println!(
                "  ✗ P{} must wait: need {} exceeds work {}",
                step.process,
                format_vector(&step.need),
                format_vector(&step.work),
            );
        }
    }
    if report.is_safe() {
        println!("✓ State is SAFE, sequence: {}", format_sequence(&report.sequence));
    } else {
        println!("⚠ State is UNSAFE, blocked: {}", format_sequence(&report.blocked));
    }
}

fn print_state(view: &SystemView) {
    println!(
        "System: {} processes, {} resource types",
        view.processes, view.resources
    );
    println!("  Total:     {}", format_vector(&view.total));
    println!("  Available: {}", format_vector(&view.available));
    println!("  Allocated: {}", format_vector(&view.total_allocated));
    println!("  {:<10} {:<14} {:<14} {:<14}", "Process", "Allocation", "Maximum", "Need");
    for i in 0..view.processes {
        println!(
            "  {:<10} {:<14} {:<14} {:<14}",
            format!("P{i}"),
            format_vector(&view.allocation[i]),
            format_vector(&view.maximum[i]),
            format_vector(&view.need[i]),
        );
    }
}

fn print_statistics(stats: &Statistics) {
    println!("Session statistics:");
    println!("  Requests granted:   {}", stats.requests_granted);
    println!("  Requests denied:    {}", stats.requests_denied);
    println!("  Releases applied:   {}", stats.resources_released);
    println!("  Deadlocks avoided:  {}", stats.deadlocks_avoided);
}

fn print_help() {
    println!("Available instructions:");
    println!("Setup:");
    println!(" $ CONFIG <n> <total>             # Configure n processes over the total vector");
    println!(" $ PROCESS <i> <alloc> <max>      # Record allocation and maximum of process i");
    println!(" $ SCENARIO <name>                # Load a preset (simple | deadlock)");
    println!();
    println!("Operations:");
    println!(" $ REQUEST <i> <amounts>          # Ask for resources on behalf of process i");
    println!(" $ RELEASE <i> <amounts>          # Hand resources back from process i");
    println!(" $ CHECK                          # Run the safety algorithm");
    println!(" $ SEQUENCES                      # Enumerate every safe completion order");
    println!();
    println!("Inspection:");
    println!(" $ STATE                          # Show matrices and vectors");
    println!(" $ STATS                          # Show session counters");
    println!(" $ RESET                          # Drop the session state");
    println!();
    println!("Utility:");
    println!(" $ HELP                           # Show this help message");
    println!(" $ # [comment]                    # Comment line");
    println!(" $                                # No operation");
    println!();
    println!("Argument format:");
    println!(" - Quantity vector: comma-separated integers, e.g. 10,8");
    println!(" - Process index: zero-based, e.g. 0");
    println!();
}

/// Drives one simulation session through the instruction DSL.
#[derive(Debug, Clone)]
pub struct SessionHandler {
    session: u32,
    service: SimulationService,
}

impl SessionHandler {
    pub fn new(session: u32) -> Self {
        Self { session, service: init_simulator() }
    }

    /// Execute an instruction against the session.
    ///
    /// Denials of requests and releases are reported as normal outcomes, not
    /// errors; only structural faults (unknown session, wrong-width vectors,
    /// negative components, out-of-range indices) propagate as `Err`.
    pub async fn execute(&mut self, instruction: &Instruction) -> anyhow::Result<()> {
        match (&instruction.command, &instruction.operands) {
            (Command::Nil, _) => Ok(()),
            (Command::Help, _) => {
                print_help();
                Ok(())
            }
            (Command::Config, Operands::Setup { processes, total }) => {
                self.service
                    .call(SimulationRequest::Configure {
                        session: self.session,
                        processes: *processes,
                        resources: total.len(),
                        total: total.clone(),
                        available: total.clone(),
                    })
                    .await?;
                println!(
                    "✓ Configured {} processes over {} resource types",
                    processes,
                    total.len()
                );
                Ok(())
            }
            (Command::Config, _) => {
                Err(anyhow::anyhow!("CONFIG requires a process count and a total vector"))
            }
            (Command::Process, Operands::Row { process, allocation, maximum }) => {
                let response = self
                    .service
                    .call(SimulationRequest::RecordProcess {
                        session: self.session,
                        process: *process,
                        allocation: allocation.clone(),
                        maximum: maximum.clone(),
                    })
                    .await?;
                if let SimulationResponse::ProcessRecorded { need } = response {
                    println!("✓ Recorded P{}, need {}", process, format_vector(&need));
                }
                Ok(())
            }
            (Command::Process, _) => {
                Err(anyhow::anyhow!("PROCESS requires an index and two quantity vectors"))
            }
            (Command::Request, Operands::Delta { process, amounts }) => {
                let outcome = self
                    .service
                    .call(SimulationRequest::RequestResources {
                        session: self.session,
                        process: *process,
                        request: amounts.clone(),
                    })
                    .await;
                match outcome {
                    Ok(SimulationResponse::Granted { report }) => {
                        println!("✓ Request granted to P{}", process);
                        print_report(&report);
                        Ok(())
                    }
                    Ok(_) => Ok(()),
                    Err(e) => report_denial("Request", e),
                }
            }
            (Command::Request, _) => {
                Err(anyhow::anyhow!("REQUEST requires an index and a quantity vector"))
            }
            (Command::Release, Operands::Delta { process, amounts }) => {
                let outcome = self
                    .service
                    .call(SimulationRequest::ReleaseResources {
                        session: self.session,
                        process: *process,
                        release: amounts.clone(),
                    })
                    .await;
                match outcome {
                    Ok(SimulationResponse::Released { report }) => {
                        println!("✓ Release applied from P{}", process);
                        print_report(&report);
                        Ok(())
                    }
                    Ok(_) => Ok(()),
                    Err(e) => report_denial("Release", e),
                }
            }
            (Command::Release, _) => {
                Err(anyhow::anyhow!("RELEASE requires an index and a quantity vector"))
            }
            (Command::Check, _) => {
                let response =
                    self.service.call(SimulationRequest::CheckSafety { session: self.session }).await?;
                if let SimulationResponse::Safety(report) = response {
                    print_report(&report);
                }
                Ok(())
            }
            (Command::Sequences, _) => {
                let response = self
                    .service
                    .call(SimulationRequest::EnumerateSequences { session: self.session })
                    .await?;
                if let SimulationResponse::Sequences(sequences) = response {
                    if sequences.is_empty() {
                        println!("⚠ No safe completion order exists");
                    } else {
                        println!("✓ {} safe completion order(s):", sequences.len());
                        for sequence in &sequences {
                            println!("  {}", format_sequence(sequence));
                        }
                    }
                }
                Ok(())
            }
            (Command::Scenario, Operands::Preset(scenario)) => {
                let response = self
                    .service
                    .call(SimulationRequest::LoadScenario {
                        session: self.session,
                        scenario: *scenario,
                    })
                    .await?;
                println!("✓ Loaded scenario {:?}", scenario);
                if let SimulationResponse::Safety(report) = response {
                    print_report(&report);
                }
                Ok(())
            }
            (Command::Scenario, _) => Err(anyhow::anyhow!("SCENARIO requires a preset name")),
            (Command::State, _) => {
                let response =
                    self.service.call(SimulationRequest::GetState { session: self.session }).await?;
                if let SimulationResponse::State(view) = response {
                    print_state(&view);
                }
                Ok(())
            }
            (Command::Stats, _) => {
                let response = self
                    .service
                    .call(SimulationRequest::GetStatistics { session: self.session })
                    .await?;
                if let SimulationResponse::Statistics(stats) = response {
                    print_statistics(&stats);
                }
                Ok(())
            }
            (Command::Reset, _) => {
                self.service.call(SimulationRequest::Reset { session: self.session }).await?;
                println!("✓ Session reset");
                Ok(())
            }
        }
    }
}

impl Default for SessionHandler {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Distinguishes verdict-style denials from structural faults.
fn report_denial(operation: &str, error: SimulationError) -> anyhow::Result<()> {
    match error {
        SimulationError::RequestUnsafe => {
            println!("⚠ {} denied: granting it would leave the state unsafe", operation);
            Ok(())
        }
        SimulationError::RequestExceedsNeed(_)
        | SimulationError::RequestExceedsAvailable(_)
        | SimulationError::ReleaseExceedsAllocation(_) => {
            println!("⚠ {} denied: {}", operation, error);
            Ok(())
        }
        other => Err(other.into()),
    }
}
