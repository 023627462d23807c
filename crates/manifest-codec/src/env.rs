// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Shell-style `$NAME` / `${NAME}` expansion against an environment source.
//!
//! Decoding goes through serde, which offers no way to pass context into a
//! `Deserialize` impl. Codecs therefore read variables through [`CurrentEnv`],
//! which resolves to the process environment unless [`with_env`] installed a
//! replacement for the current thread. Tests use that hook (or the explicit
//! `*_with` codec functions) instead of mutating the real environment.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;

/// A read-only view of environment variables.
pub trait EnvSource {
    /// Value of `name`, or `None` when it is not set.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Whatever environment is in effect on this thread: the source installed by
/// [`with_env`], or the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentEnv;

impl EnvSource for CurrentEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        // Clone out of the slot so a source may itself call `with_env`.
        let scoped = SCOPED_ENV.with(|slot| slot.borrow().clone());
        match scoped {
            Some(source) => source.lookup(name),
            None => ProcessEnv.lookup(name),
        }
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

thread_local! {
    static SCOPED_ENV: RefCell<Option<Rc<dyn EnvSource>>> = const { RefCell::new(None) };
}

/// Runs `f` with `source` as the environment seen by [`CurrentEnv`] on this
/// thread. The previous source is restored afterwards, also on unwind.
pub fn with_env<S, F, R>(source: S, f: F) -> R
where
    S: EnvSource + 'static,
    F: FnOnce() -> R,
{
    let previous = SCOPED_ENV.with(|slot| slot.replace(Some(Rc::new(source))));
    let _restore = RestoreScopedEnv(previous);
    f()
}

struct RestoreScopedEnv(Option<Rc<dyn EnvSource>>);

impl Drop for RestoreScopedEnv {
    fn drop(&mut self) {
        let previous = self.0.take();
        SCOPED_ENV.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Replaces `$NAME`, `${NAME}` and the one-character special variables
/// (`$1`, `$?`, ...) in `raw` with their values from `env`.
///
/// Unset variables expand to the empty string. A `$` that is not followed by
/// a name stays as is; malformed braces (`${}`, an unterminated `${`) are
/// dropped.
pub fn expand<E: EnvSource + ?Sized>(raw: &str, env: &E) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' || i + 1 == bytes.len() {
            i += 1;
            continue;
        }

        out.push_str(&raw[literal_start..i]);
        let (name, consumed) = shell_name(&raw[i + 1..]);
        match name {
            Some(name) => out.push_str(&env.lookup(name).unwrap_or_default()),
            None if consumed == 0 => out.push('$'),
            None => {}
        }
        i += 1 + consumed;
        literal_start = i;
    }

    out.push_str(&raw[literal_start..]);
    out
}

/// Parses the variable reference following a `$`.
///
/// Returns the name (if the syntax was valid) and how many bytes the
/// reference occupies. `(None, 0)` means there was no reference at all.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let bytes = s.as_bytes();

    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special_var(bytes[1]) && bytes[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match s[1..].find('}') {
            Some(0) => (None, 2),
            Some(end) => (Some(&s[1..=end]), end + 2),
            None => (None, 1),
        };
    }

    if is_special_var(bytes[0]) {
        return (Some(&s[..1]), 1);
    }

    let len = bytes.iter().take_while(|b| b.is_ascii_alphanumeric() || **b == b'_').count();
    if len == 0 {
        (None, 0)
    } else {
        (Some(&s[..len]), len)
    }
}

fn is_special_var(b: u8) -> bool {
    matches!(b, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || b.is_ascii_digit()
}
