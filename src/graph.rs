//! The state graph: a static mapping from each non-terminal state to its
//! `false`/`true` successors.
//!
//! `kellymclaughlin-airship-rust`'s `decision.rs` encodes this same graph as
//! a web of Rust function calls (`b13` calls `b12` or halts, `b12` calls
//! `b11` or halts, ...) dispatched by direct `fn` calls rather than data.
//! Here it is re-cast as an explicit tagged variant (`NonTerminal` vs
//! `Terminal`) resolved against a data table, so the walk is "look up a
//! state, call its transition, look up the next state" rather than "call a
//! function which calls the next function" — this is what lets
//! [`crate::driver`] bound the walk by counting steps instead of trusting
//! the call graph not to recurse forever.

/// A node in the decision graph. `Terminal` carries the HTTP status code
/// the walk ends at; every other variant is a named decision point with a
/// transition function in [`crate::decision`] and an entry in
/// [`successors`].
///
/// Node names and routing follow the canonical Webmachine v3 decision
/// diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    B13,
    B12,
    B11,
    B10,
    B9,
    B8,
    B7,
    B6,
    B5,
    B4,
    B3,
    C3,
    C4,
    D4,
    E5,
    F6,
    G7,
    G8,
    G9,
    G11,
    H7,
    H10,
    H11,
    H12,
    I4,
    I7,
    I12,
    I13,
    J18,
    K5,
    K7,
    K13,
    L5,
    L7,
    L13,
    L14,
    L15,
    L17,
    M5,
    M7,
    M16,
    M20,
    N5,
    N11,
    N16,
    O14,
    O16,
    O18,
    O20,
    P3,
    P11,
    /// A terminal state: the walk ends here and the response status is set
    /// to the carried code.
    Terminal(u16),
}

impl State {
    /// `Some(code)` if this is a terminal state, `None` for a named
    /// decision point. Decided once at definition time rather than
    /// re-parsed from a string on every step of every walk.
    pub fn terminal_code(self) -> Option<u16> {
        match self {
            State::Terminal(code) => Some(code),
            _ => None,
        }
    }
}

/// The start state of every walk.
pub const START: State = State::B13;

/// The fallback terminal used when a non-terminal state's successor is
/// missing from the graph. In this crate every non-terminal listed in
/// [`State`] has both successors defined in [`successors`], so this path is
/// unreachable in practice; it exists as a defined fallback rather than a
/// panic, so a future edit that forgets an entry degrades to a 500 instead
/// of crashing the process.
pub const MISSING_SUCCESSOR: State = State::Terminal(500);

/// Looks up the `(false, true)` successor pair for a non-terminal state.
/// Returns `None` for a [`State::Terminal`] (it has no successors) or, in
/// principle, for a non-terminal state missing from the table below — the
/// latter cannot happen for any variant of [`State`] other than `Terminal`,
/// since every one is covered by this match, but the driver still treats a
/// `None` here as "missing successor" and falls back to
/// [`MISSING_SUCCESSOR`] rather than panicking.
pub fn successors(state: State) -> Option<(State, State)> {
    use State::*;
    Some(match state {
        B13 => (Terminal(503), B12),
        B12 => (Terminal(501), B11),
        B11 => (B10, Terminal(414)),
        B10 => (Terminal(405), B9),
        B9 => (B8, Terminal(400)),
        B8 => (Terminal(401), B7),
        B7 => (B6, Terminal(403)),
        B6 => (B5, Terminal(501)),
        B5 => (B4, Terminal(415)),
        B4 => (B3, Terminal(413)),
        B3 => (C3, Terminal(200)),
        C3 => (D4, C4),
        C4 => (Terminal(406), D4),
        D4 => (E5, Terminal(406)),
        E5 => (F6, Terminal(406)),
        F6 => (G7, Terminal(406)),
        G7 => (H7, G8),
        G8 => (H10, G9),
        G9 => (G11, H10),
        G11 => (Terminal(412), H10),
        H7 => (I7, Terminal(412)),
        H10 => (I12, H11),
        H11 => (I12, H12),
        H12 => (I12, Terminal(412)),
        I4 => (P3, Terminal(301)),
        I7 => (K7, I4),
        I12 => (L13, I13),
        I13 => (K13, J18),
        J18 => (Terminal(412), Terminal(304)),
        K5 => (L5, Terminal(301)),
        K7 => (L7, K5),
        K13 => (L13, J18),
        L5 => (M5, Terminal(307)),
        L7 => (Terminal(404), M7),
        L13 => (M16, L14),
        L14 => (M16, L15),
        L15 => (L17, M16),
        L17 => (Terminal(304), M16),
        M5 => (Terminal(410), N5),
        M7 => (Terminal(404), N11),
        M16 => (N16, M20),
        M20 => (Terminal(202), O20),
        N5 => (Terminal(410), N11),
        N11 => (P11, Terminal(303)),
        N16 => (O16, N11),
        O14 => (P11, Terminal(409)),
        O16 => (O18, O14),
        O18 => (Terminal(200), Terminal(300)),
        O20 => (Terminal(204), O18),
        P3 => (P11, Terminal(409)),
        P11 => (O20, Terminal(201)),
        Terminal(_) => return None,
    })
}

/// All non-terminal states — used by the graph-totality and acyclicity
/// tests to enumerate every node without having to drive an actual request
/// through each one.
#[cfg(test)]
pub(crate) const ALL_NON_TERMINAL: &[State] = {
    use State::*;
    &[
        B13, B12, B11, B10, B9, B8, B7, B6, B5, B4, B3, C3, C4, D4, E5, F6, G7, G8, G9, G11, H7,
        H10, H11, H12, I4, I7, I12, I13, J18, K5, K7, K13, L5, L7, L13, L14, L15, L17, M5, M7,
        M16, M20, N5, N11, N16, O14, O16, O18, O20, P3, P11,
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_non_terminal_has_both_successors() {
        for &state in ALL_NON_TERMINAL {
            let (f, t) = successors(state)
                .unwrap_or_else(|| panic!("{:?} is missing a successors() entry", state));
            assert!(state.terminal_code().is_none());
            // A successor is either Terminal (any code — validity of the
            // specific code is asserted in the reachability test below) or
            // itself a non-terminal present in ALL_NON_TERMINAL.
            for successor in [f, t] {
                if successor.terminal_code().is_none() {
                    assert!(
                        ALL_NON_TERMINAL.contains(&successor),
                        "{:?} routes to {:?}, which is not in ALL_NON_TERMINAL",
                        state,
                        successor
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_has_no_successors() {
        assert!(successors(Terminal(200)).is_none());
    }

    #[test]
    fn every_recognized_terminal_status_is_reachable() {
        use std::collections::HashSet;
        let recognized_terminals: HashSet<u16> = [
            200, 201, 202, 204, 300, 301, 303, 304, 307, 400, 401, 403, 404, 405, 406, 409, 410,
            412, 413, 414, 415, 501, 503,
        ]
        .into_iter()
        .collect();

        let mut reached: HashSet<u16> = HashSet::new();
        for &state in ALL_NON_TERMINAL {
            let (f, t) = successors(state).unwrap();
            for successor in [f, t] {
                if let Some(code) = successor.terminal_code() {
                    reached.insert(code);
                }
            }
        }

        for code in recognized_terminals {
            assert!(reached.contains(&code), "status {} has no edge into it", code);
        }
        // 500 is the runtime missing-successor fallback, deliberately not
        // an explicit edge target.
        assert!(!reached.contains(&500));
    }

    #[test]
    fn walk_from_start_terminates_within_non_terminal_count() {
        // §8 termination property: every walk reaches a terminal state in
        // at most as many steps as there are non-terminal nodes. Exercises
        // both the false-only and true-only paths from every intermediate
        // state reached along the way, rather than just the single path a
        // live request would take.
        fn walk(mut state: State, force_true: bool, limit: usize) -> State {
            for _ in 0..=limit {
                if state.terminal_code().is_some() {
                    return state;
                }
                let (on_false, on_true) = successors(state).unwrap();
                state = if force_true { on_true } else { on_false };
            }
            panic!("walk from {:?} did not terminate within {} steps", START, limit);
        }

        let limit = ALL_NON_TERMINAL.len();
        assert!(walk(START, false, limit).terminal_code().is_some());
        assert!(walk(START, true, limit).terminal_code().is_some());
    }

    #[test]
    fn graph_is_acyclic() {
        // Standard white/grey/black DFS cycle check: `on_stack` is the
        // current path (grey), `done` is everything already proven
        // cycle-free (black). A finite DAG bounds every walk by its node
        // count, so a single linear-time acyclicity check stands in for
        // proving that bound by exhaustively walking every branch (which
        // would be exponential in the number of non-terminal nodes).
        use std::collections::HashSet;

        fn visit(state: State, on_stack: &mut Vec<State>, done: &mut HashSet<State>) {
            if done.contains(&state) || state.terminal_code().is_some() {
                return;
            }
            assert!(
                !on_stack.contains(&state),
                "cycle detected: {:?} revisited via path {:?}",
                state,
                on_stack
            );
            on_stack.push(state);
            let (f, t) = successors(state).unwrap();
            visit(f, on_stack, done);
            visit(t, on_stack, done);
            on_stack.pop();
            done.insert(state);
        }

        let mut on_stack = Vec::new();
        let mut done = HashSet::new();
        for &state in ALL_NON_TERMINAL {
            visit(state, &mut on_stack, &mut done);
        }
    }
}
