//! Clock driver and commit poll tests.

use npcsim_core::common::{BOOT_PC, COMMIT_TIMEOUT_CYCLES};
use npcsim_core::config::Config;
use npcsim_core::design::{Design, Halt, ReplayDesign};
use npcsim_core::driver::{ClockDriver, CommitPoller};
use npcsim_core::sim::RunState;
use npcsim_core::{SimError, Simulator};

use crate::common::harness::{BOOT, StuckDesign, TestContext, halting, init_tracing, straight_line};
use crate::common::mocks::collaborators::{MockWaveform, permissive_waveform};

#[test]
fn step_counts_cycles_and_half_cycles() {
    let mut clock = ClockDriver::new(StuckDesign::new(BOOT));
    clock.set_waveform(Box::new(permissive_waveform()));
    clock.open_waveform().unwrap();
    clock.reset(2).unwrap();
    clock.step().unwrap();

    assert_eq!(clock.cycles(), 3);
    assert_eq!(clock.sim_time(), 6);
    assert_eq!(clock.arch().pc, BOOT);
    clock.close_waveform().unwrap();
}

#[test]
fn sim_time_does_not_advance_without_a_waveform() {
    let mut clock = ClockDriver::new(StuckDesign::new(BOOT));
    clock.step().unwrap();
    assert_eq!(clock.cycles(), 1);
    assert_eq!(clock.sim_time(), 0);
}

#[test]
fn poll_gives_up_at_the_ceiling() {
    let mut clock = ClockDriver::new(StuckDesign::new(BOOT));
    let mut poller = CommitPoller::new(COMMIT_TIMEOUT_CYCLES);

    let poll = poller.await_commit(&mut clock).unwrap();
    assert!(!poll.committed);
    assert_eq!(poll.waited, COMMIT_TIMEOUT_CYCLES);
    assert_eq!(poller.timeouts(), 1);
    // Ceiling plus the trailing advance cycle.
    assert_eq!(clock.cycles(), u64::from(COMMIT_TIMEOUT_CYCLES) + 1);
}

#[test]
fn poll_returns_as_soon_as_commit_is_seen() {
    let mut records = straight_line(2);
    records[0].latency = 3;
    let mut clock = ClockDriver::new(ReplayDesign::new(records).unwrap());
    clock.reset(1).unwrap();
    let mut poller = CommitPoller::new(COMMIT_TIMEOUT_CYCLES);

    let poll = poller.await_commit(&mut clock).unwrap();
    assert!(poll.committed);
    assert_eq!(poll.waited, 3);
    assert_eq!(poll.retirement.pc, BOOT);
    assert_eq!(poller.timeouts(), 0);
    assert!(!clock.design().commit());
}

#[test]
fn halt_cuts_the_poll_short_without_a_timeout() {
    let mut clock = ClockDriver::new(ReplayDesign::new(straight_line(1)).unwrap());
    clock.reset(1).unwrap();
    let mut poller = CommitPoller::new(COMMIT_TIMEOUT_CYCLES);
    assert!(poller.await_commit(&mut clock).unwrap().committed);

    let poll = poller.await_commit(&mut clock).unwrap();
    assert!(!poll.committed);
    assert_eq!(poll.waited, 1);
    assert_eq!(clock.design().halt(), Some(Halt::Abort));
    assert_eq!(poller.timeouts(), 0);
    assert_eq!(clock.cycles(), 1 + 2 + 2);
}

#[test]
fn stalled_design_counts_timeouts_without_scoring() {
    init_tracing();
    let mut sim = Simulator::new(StuckDesign::new(BOOT), Config::default());
    sim.init().unwrap();

    assert_eq!(sim.run(3).unwrap(), RunState::Stopped);
    assert_eq!(sim.retired(), 3);
    assert_eq!(sim.commit_timeouts(), 3);
    assert_eq!(sim.cycles(), 1 + 3 * (u64::from(COMMIT_TIMEOUT_CYCLES) + 1));
    assert_eq!(sim.stats().control_flow().total, 0);
}

#[test]
fn custom_poll_ceiling_from_config() {
    let mut config = Config::default();
    config.general.commit_timeout = 5;
    let mut sim = Simulator::new(StuckDesign::new(BOOT), config);
    sim.init().unwrap();
    sim.run(1).unwrap();
    assert_eq!(sim.cycles(), 1 + 5 + 1);
}

#[test]
fn wrong_boot_pc_is_fatal_and_closes_the_waveform() {
    init_tracing();
    let mut wave = MockWaveform::new();
    wave.expect_open().times(1).returning(|| Ok(()));
    wave.expect_dump().times(2).returning(|_| Ok(()));
    wave.expect_close().times(1).returning(|| Ok(()));

    let mut sim = Simulator::new(StuckDesign::new(0x0000_1000), Config::default());
    sim.set_waveform(Box::new(wave));

    let err = sim.init().unwrap_err();
    assert!(matches!(
        err,
        SimError::BootPcMismatch {
            expected: BOOT_PC,
            actual: 0x0000_1000
        }
    ));
    assert_eq!(
        err.to_string(),
        "after reset the design PC should be 0x80000000, found 0x00001000"
    );
}

#[test]
fn boot_pc_is_configurable() {
    let mut config = Config::default();
    config.general.boot_pc = 0x0000_1000;
    let mut sim = Simulator::new(StuckDesign::new(0x0000_1000), config);
    assert!(sim.init().is_ok());
}

#[test]
fn waveform_closes_once_on_program_end() {
    let mut ctx = TestContext::new(halting(straight_line(3), 0));
    ctx.sim.set_waveform(Box::new(permissive_waveform()));
    ctx = ctx.booted();

    assert_eq!(ctx.sim.run(10).unwrap(), RunState::Ended);
    // Second close is a no-op once the sink is detached.
    ctx.sim.statistic().unwrap();
}

#[test]
fn waveform_errors_propagate() {
    let mut wave = MockWaveform::new();
    wave.expect_open().returning(|| {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "trace.vcd"))
    });
    let mut sim = Simulator::new(StuckDesign::new(BOOT), Config::default());
    sim.set_waveform(Box::new(wave));
    assert!(matches!(sim.init(), Err(SimError::Io(_))));
}
