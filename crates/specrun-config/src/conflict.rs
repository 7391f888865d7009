//! Package name conflict resolution among discovered test units
//!
//! Generated packages are all imported into one main package, so two test
//! packages declaring the same name need distinct local names there.

use crate::config::TestUnit;
use log::{info, warn};
use rand::Rng;
use std::collections::HashMap;

/// Give every unit whose name is already taken an alias
///
/// Single in-place pass. The first unit with a name keeps it; later ones get
/// an alias derived from where their import path differs from the holder's.
/// Units are keyed by [`TestUnit::name`], so running it again over a resolved
/// list leaves non-colliding units untouched.
///
/// An alias replaces whatever unit held that name before. When an earlier
/// unit already declares a package named like the new alias, both end up
/// with the same name, and a second pass renames the aliased unit again.
pub fn resolve_conflicts(units: &mut [TestUnit]) {
    resolve_conflicts_with(units, &mut rand::rng());
}

/// [`resolve_conflicts`] with a caller-supplied source for the digit fallback
pub fn resolve_conflicts_with<R: Rng>(units: &mut [TestUnit], rng: &mut R) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for idx in 0..units.len() {
        let name = units[idx].name().to_string();
        let Some(&holder) = seen.get(&name) else {
            seen.insert(name, idx);
            continue;
        };

        let alias = derive_alias(
            units[idx].package_name(),
            units[holder].leaf(),
            units[idx].leaf(),
            rng,
        );
        info!(
            "package name {} of {} collides with {}, using {}",
            name,
            units[idx].import_path(),
            units[holder].import_path(),
            alias
        );
        units[idx].set_alias(alias.clone());
        seen.insert(alias, idx);
    }
}

/// Prefix `package_name` with the first character where `leaf` departs from
/// `holder_leaf`, compared over the shorter of the two.
///
/// Without such a character, a random digit is appended instead. That can
/// collide again; it is not retried. Neither form is checked against names
/// already taken, see [`resolve_conflicts`].
fn derive_alias<R: Rng>(
    package_name: &str,
    holder_leaf: &str,
    leaf: &str,
    rng: &mut R,
) -> String {
    let diverging = leaf
        .chars()
        .zip(holder_leaf.chars())
        .find(|(ours, theirs)| ours != theirs)
        .map(|(ours, _)| ours);

    match diverging {
        Some(c) => format!("{}{}", c, package_name),
        None => {
            let digit: u8 = rng.random_range(0..10);
            warn!(
                "import paths ending in {} and {} give no distinguishing character, appending {}",
                holder_leaf, leaf, digit
            );
            format!("{}{}", package_name, digit)
        }
    }
}
