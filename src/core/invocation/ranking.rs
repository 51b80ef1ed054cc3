// src/core/invocation/ranking.rs
use super::{HasStructure, InvocationEntry, InvocationKind};

/// Order invocation entries by the fixed priority heuristic: packages and
/// libraries first, then README mentions, services, mains, bodies. The
/// sort is stable, ties share a rank, and ranks are dense: the rank only
/// steps by one each time the score strictly decreases.
pub fn rank_invocations(mut entries: Vec<InvocationEntry>) -> Vec<InvocationEntry> {
    if entries.is_empty() {
        return entries;
    }

    let mut scored: Vec<(u32, InvocationEntry)> =
        entries.drain(..).map(|e| (score(&e), e)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut position = 1;
    let mut previous = scored[0].0;
    let mut ranked = Vec::with_capacity(scored.len());
    for (current, mut entry) in scored {
        if previous > current {
            position += 1;
            previous = current;
        }
        entry.ranking = Some(position);
        ranked.push(entry);
    }
    ranked
}

/// Additive, independent signals.
fn score(entry: &InvocationEntry) -> u32 {
    let mut score = 0;
    if matches!(
        entry.kind,
        InvocationKind::Package | InvocationKind::Library
    ) {
        score += 100;
    }
    if entry.mentioned_in_readme == Some(true) {
        score += 10;
    }
    if entry.kind == InvocationKind::Service {
        score += 5;
    }
    match entry.has_structure {
        Some(HasStructure::Main) => score += 2,
        Some(HasStructure::Body) => score += 1,
        _ => {}
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: InvocationKind, structure: Option<HasStructure>, readme: bool) -> InvocationEntry {
        InvocationEntry {
            has_structure: structure,
            mentioned_in_readme: Some(readme),
            ..InvocationEntry::new(kind)
        }
    }

    #[test]
    fn ranks_are_dense_and_ties_share_a_position() {
        let entries = vec![
            entry(InvocationKind::Script, Some(HasStructure::Main), false),
            entry(InvocationKind::Package, None, false),
            entry(InvocationKind::Script, Some(HasStructure::Main), false),
            entry(InvocationKind::Script, Some(HasStructure::Body), false),
        ];

        let ranked = rank_invocations(entries);
        let positions: Vec<u32> = ranked.iter().map(|e| e.ranking.unwrap()).collect();
        assert_eq!(positions, vec![1, 2, 2, 3]);
        assert_eq!(ranked[0].kind, InvocationKind::Package);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        assert!(rank_invocations(Vec::new()).is_empty());
    }
}
