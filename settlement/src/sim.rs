//! Simulation runner: bank setup, thread lifecycle, shutdown.
//!
//! Lifecycle per bank: SETUP (accounts and reserves created) → OPERATING
//! (generator and processors running) → DRAINING (flag cleared, queue
//! closed, workers waking) → STOPPED (threads joined, statistics frozen).

use crate::bank::Bank;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generator::TransactionGenerator;
use crate::processor::PaymentProcessor;
use crate::registry::BankRegistry;
use crate::report::SimulationReport;
use bank_core::{BankId, Currency};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A configured simulation, ready to run.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    registry: Arc<BankRegistry>,
}

impl Simulation {
    /// Build the bank network: one bank per supported currency, reserves
    /// seeded with large random balances, client accounts opened with
    /// random balances and overdraft limits.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut banks = Vec::with_capacity(Currency::COUNT);
        for (index, currency) in Currency::ALL.into_iter().enumerate() {
            let mut bank = Bank::new(BankId::new(index as u32), currency, |_| {
                rng.gen_range(config.reserve_seed_min..=config.reserve_seed_max)
            });
            for _ in 0..config.accounts_per_bank {
                let balance = rng.gen_range(0..=config.initial_balance_max);
                let overdraft_limit = rng.gen_range(0..=config.initial_balance_max);
                bank.new_account(balance, overdraft_limit);
            }
            banks.push(bank);
        }

        Ok(Self {
            config,
            registry: Arc::new(BankRegistry::new(banks)),
        })
    }

    /// Banks participating in this simulation.
    pub fn registry(&self) -> &Arc<BankRegistry> {
        &self.registry
    }

    /// Run to completion and return the final report.
    ///
    /// Blocks the calling thread for roughly `total_time` time units, then
    /// performs the four-phase shutdown: clear the operating flags, join
    /// the generators, close every queue (waking all blocked processors),
    /// join the processors. Every transaction dequeued before the close
    /// reaches a terminal status; everything still queued is reported as
    /// pending.
    pub fn run(&self) -> Result<SimulationReport> {
        let time_unit = self.config.time_unit();
        let delay = self.config.processing_delay();

        tracing::info!(
            banks = self.registry.len(),
            processors_per_bank = self.config.processors_per_bank,
            total_time = self.config.total_time,
            "starting simulation"
        );

        let mut generators: Vec<JoinHandle<()>> = Vec::new();
        let mut processors: Vec<JoinHandle<()>> = Vec::new();

        for (index, bank) in self.registry.banks().iter().enumerate() {
            let generator_seed = self
                .config
                .rng_seed
                .map(|seed| seed.wrapping_add(index as u64 + 1));
            let generator = TransactionGenerator::new(
                Arc::clone(bank),
                Arc::clone(&self.registry),
                generator_seed,
                time_unit,
                (self.config.amount_min, self.config.amount_max),
            );
            generators.push(
                thread::Builder::new()
                    .name(format!("generator-{index}"))
                    .spawn(move || generator.run())?,
            );

            for worker in 0..self.config.processors_per_bank {
                let processor = PaymentProcessor::new(
                    worker,
                    Arc::clone(bank),
                    Arc::clone(&self.registry),
                    delay,
                );
                processors.push(
                    thread::Builder::new()
                        .name(format!("processor-{index}-{worker}"))
                        .spawn(move || processor.run())?,
                );
            }
        }

        // Main clock: advance in random whole-unit steps until the total
        // simulated duration has elapsed.
        let mut clock = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut elapsed = 0u64;
        while elapsed < self.config.total_time {
            let step = clock.gen_range(0..=3u32);
            thread::sleep(time_unit * step);
            elapsed += u64::from(step);
        }

        tracing::info!("simulated time elapsed, draining banks");

        // Shutdown: flags first, then the generators, then the admission
        // broadcast, then the processor pool.
        for bank in self.registry.banks() {
            bank.begin_drain();
        }
        join_all(generators)?;
        for bank in self.registry.banks() {
            bank.queue().close();
        }
        join_all(processors)?;

        let report = SimulationReport {
            banks: self
                .registry
                .banks()
                .iter()
                .map(|bank| bank.report())
                .collect(),
        };
        tracing::info!(
            unprocessed = report.total_unprocessed(),
            "simulation finished"
        );
        Ok(report)
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) -> Result<()> {
    for handle in handles {
        let name = handle.thread().name().unwrap_or("worker").to_string();
        handle
            .join()
            .map_err(|_| Error::WorkerPanicked(name))?;
    }
    Ok(())
}
