//! Door Controller
//!
//! This demo drives a small hierarchical state machine for a motorised
//! door.
//!
//! Key concepts:
//! - Nested states (Operational contains Closed, Opening, Open)
//! - Events bubbling from a child to its parent
//! - An entry hook that redirects (Locked refuses entry while the door is open)
//! - Tracing output of every entry/exit step
//!
//! Run with: RUST_LOG=stratum=trace cargo run --example door_controller

use stratum::{Dispatch, StateMachine, StateTreeBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum DoorEvent {
    Button,
    FullyOpen,
    Lock,
    Unlock,
    Fault,
}

#[derive(Default)]
struct Door {
    motor_running: bool,
    ajar: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door Controller ===\n");

    let mut states = StateTreeBuilder::<Door, DoorEvent>::new();
    let operational = states.declare("Operational");
    let closed = states.declare_child("Closed", operational);
    let opening = states.declare_child("Opening", operational);
    let open = states.declare_child("Open", operational);
    let locked = states.declare("Locked");
    let faulted = states.declare("Faulted");

    // Faults are handled once, at the top of the operational branch.
    states.define(operational).on_event(move |ctx, event| {
        if let DoorEvent::Fault = event {
            ctx.transition_to(faulted);
        }
    });

    states
        .define(closed)
        .on_entry(|ctx| ctx.env_mut().ajar = false)
        .on_event(move |ctx, event| match event {
            DoorEvent::Button => ctx.transition_to(opening),
            DoorEvent::Lock => ctx.transition_to(locked),
            _ => {}
        });

    states
        .define(opening)
        .on_entry(|ctx| ctx.env_mut().motor_running = true)
        .on_event(move |ctx, event| {
            if let DoorEvent::FullyOpen = event {
                ctx.transition_to(open);
            }
        })
        .on_exit(|ctx| ctx.env_mut().motor_running = false);

    states
        .define(open)
        .on_entry(|ctx| ctx.env_mut().ajar = true)
        .on_event(move |ctx, event| match event {
            DoorEvent::Button => ctx.transition_to(closed),
            DoorEvent::Lock => ctx.transition_to(locked),
            _ => {}
        });

    // Locking an open door bounces straight back to Open.
    states
        .define(locked)
        .on_entry(move |ctx| {
            if ctx.env().ajar {
                ctx.transition_to(open);
            }
        })
        .on_event(move |ctx, event| {
            if let DoorEvent::Unlock = event {
                ctx.transition_to(closed);
            }
        });

    states.define(faulted).on_event(|ctx, _| ctx.mark_event_handled());

    let tree = match states.build() {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!("Invalid state tree: {error}");
            return;
        }
    };

    let mut door = StateMachine::new(tree, Door::default());
    if let Err(error) = door.initial_transition(closed) {
        eprintln!("Initial transition failed: {error}");
        return;
    }
    report(&door);

    let script = [
        DoorEvent::Button,
        DoorEvent::FullyOpen,
        DoorEvent::Lock,
        DoorEvent::Button,
        DoorEvent::Lock,
        DoorEvent::Button,
        DoorEvent::Unlock,
        DoorEvent::Fault,
        DoorEvent::Button,
    ];

    for event in &script {
        match door.handle_event(event) {
            Ok(Dispatch::Transitioned { by }) => {
                println!("{event:?}: handled by {} (transition)", door.tree().name(by));
            }
            Ok(Dispatch::Handled { by }) => {
                println!("{event:?}: handled by {}", door.tree().name(by));
            }
            Ok(Dispatch::Unhandled) => println!("{event:?}: ignored"),
            Err(error) => println!("{event:?}: failed: {error}"),
        }
        report(&door);
    }

    println!("\n=== Demo Complete ===");
}

fn report(door: &StateMachine<Door, DoorEvent>) {
    let path = door
        .current_state()
        .map(|state| door.tree().path(state))
        .unwrap_or_else(|| "<none>".to_string());
    println!("  now in {path} (motor running: {})", door.env().motor_running);
}
