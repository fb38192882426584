//! Swipe Reflex entry point
//!
//! On the web the page drives `WebSession` from the library. Natively this
//! runs a headless bot through one full run on a manual clock and prints the
//! summary, which is handy for eyeballing tuning changes.
//!
//! Usage: `swipe-reflex [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use swipe_reflex::platform::{CueLog, ManualClock, PointerEvent, PointerKind, TimeSource};
    use swipe_reflex::sim::{Direction, RunSummary, SessionController};
    use swipe_reflex::{GameConfig, ScoreTotals};

    /// One simulated frame
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stops a misconfigured run from spinning forever
    const MAX_FRAMES: u32 = 2_000_000;

    fn key_for(direction: Direction) -> &'static str {
        match direction {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }

    /// How the bot will answer the card on screen
    struct Plan {
        sequence_id: u64,
        answer_at: f64,
        direction: Direction,
        drag: Option<PointerKind>,
    }

    fn plan_for(
        rng: &mut Pcg32,
        sequence_id: u64,
        target: Direction,
        now: f64,
        accuracy: f64,
    ) -> Plan {
        let direction = if rng.random_bool(accuracy) {
            target
        } else {
            Direction::random(rng)
        };
        let drag = match rng.random_range(0..3) {
            0 => None,
            1 => Some(PointerKind::Mouse),
            _ => Some(PointerKind::Touch),
        };
        Plan {
            sequence_id,
            answer_at: now + rng.random_range(220.0..900.0),
            direction,
            drag,
        }
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig, Box<dyn std::error::Error>> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                Ok(GameConfig::from_json(&json)?)
            }
            None => Ok(GameConfig::default()),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);
        let config = load_config(args.next().as_deref())?;
        log::info!("Headless run with seed {seed}");

        let clock = ManualClock::new(0.0);
        let mut session = SessionController::new(config, CueLog::new(), ScoreTotals::load(), seed)?;
        session.set_on_game_over(Box::new(|summary: &RunSummary| {
            log::info!(
                "Run {} over: score {} after {} cards",
                summary.run_id,
                summary.final_score,
                summary.stats.cards_dealt
            );
        }));

        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut plan: Option<Plan> = None;
        let mut cue_count = 0usize;

        session.start_run(clock.now_ms());
        for _ in 0..MAX_FRAMES {
            if session.engine().is_game_over() {
                break;
            }
            clock.advance(FRAME_MS);
            let now = clock.now_ms();
            session.update(now);
            cue_count += session.cues_mut().drain().len();

            let Some(card) = session.card() else {
                continue;
            };
            let current = match plan.take() {
                Some(p) if p.sequence_id == card.sequence_id() => p,
                _ => plan_for(&mut bot, card.sequence_id(), card.target_direction(), now, 0.9),
            };
            if now < current.answer_at {
                plan = Some(current);
                continue;
            }

            match current.drag {
                None => {
                    session.handle_key(key_for(current.direction), now);
                }
                Some(kind) => {
                    let (x, y) = (400.0, 300.0);
                    let delta = current.direction.unit() * 120.0;
                    session.handle_pointer(PointerEvent::Down {
                        id: 1,
                        kind,
                        x,
                        y,
                        time_ms: now - 150.0,
                    });
                    session.handle_pointer(PointerEvent::Move {
                        id: 1,
                        x: x + delta.x * 0.5,
                        y: y + delta.y * 0.5,
                    });
                    session.handle_pointer(PointerEvent::Up {
                        id: 1,
                        x: x + delta.x,
                        y: y + delta.y,
                        time_ms: now,
                    });
                }
            }
            cue_count += session.cues_mut().drain().len();
        }

        let Some(summary) = session.last_summary().copied() else {
            log::warn!("Run did not finish within {MAX_FRAMES} frames");
            return Ok(());
        };

        if let Some(request) = session.request_score_submission() {
            session.finish_score_submission(request.run_id, Ok(()));
        }

        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!(
            "cues played: {cue_count}, stage reached: {:?}, totals: {} over {} runs",
            session.engine().atmosphere(),
            session.totals().total_score,
            session.totals().submitted_runs
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Swipe Reflex (native) starting...");
    if let Err(err) = headless::run() {
        log::error!("Headless run failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `wasm_start` in the library
}
