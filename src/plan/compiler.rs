//! Flattening of the phase tree into a [`DecisionPlan`].

use std::iter;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::conditions::{ConditionResponse, StateCondition};
use crate::core::{EngineConfig, EngineError, ExclusivityGroup, GameState};
use crate::events::EventKind;
use crate::phases::{ConflictResolutionStrategy, GamePhase, Priority};
use crate::rules::Rule;

/// One leaf phase, ready for dispatch.
#[derive(Clone, Debug)]
pub struct DecisionPlanEntry {
    pub phase_number: u32,
    pub label: String,
    /// Conditions of the enclosing composite phases, outermost first.
    pub gates: Vec<StateCondition>,
    pub condition: StateCondition,
    pub rule: Rule,
    /// Every gate and the own condition are `Always`.
    pub condition_always_valid: bool,
    pub priority: Priority,
    pub strategy: ConflictResolutionStrategy,
}

impl DecisionPlanEntry {
    /// Whether the phase is open in `state`: the first non-valid gate or
    /// condition response, else `Valid`.
    pub fn is_open(&self, state: &GameState) -> ConditionResponse {
        if self.condition_always_valid {
            return ConditionResponse::valid();
        }
        for condition in self.gates.iter().chain(iter::once(&self.condition)) {
            let response = condition.evaluate(state);
            if !response.is_valid() {
                return response;
            }
        }
        ConditionResponse::valid()
    }
}

/// Compiled, read-only evaluation order over a phase tree.
///
/// `event_kinds`, `exclusivity_groups` and `group_roots` are indexed like
/// `entries`. `group_roots[i]` is the first entry sharing entry `i`'s group,
/// or `i` itself when the entry is ungrouped.
#[derive(Clone, Debug, Default)]
pub struct DecisionPlan {
    entries: Vec<DecisionPlanEntry>,
    event_kinds: Vec<EventKind>,
    exclusivity_groups: Vec<Option<ExclusivityGroup>>,
    group_roots: Vec<usize>,
}

impl DecisionPlan {
    /// Compile `root` depth-first.
    ///
    /// Rule-less leaves contribute no entry. Duplicate phase numbers and
    /// composite phases carrying a rule are definition errors.
    pub fn compile(root: &GamePhase, config: &EngineConfig) -> Result<Self, EngineError> {
        let mut compiler = Compiler {
            config,
            seen: FxHashSet::default(),
            gates: Vec::new(),
            plan: DecisionPlan::default(),
        };
        compiler.visit(root)?;
        let mut plan = compiler.plan;

        let mut roots: FxHashMap<&ExclusivityGroup, usize> = FxHashMap::default();
        plan.group_roots = plan
            .exclusivity_groups
            .iter()
            .enumerate()
            .map(|(index, group)| match group {
                Some(group) => *roots.entry(group).or_insert(index),
                None => index,
            })
            .collect();

        debug!(
            entries = plan.len(),
            phases = root.phase_count(),
            groups = roots.len(),
            "compiled decision plan"
        );
        Ok(plan)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[DecisionPlanEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&DecisionPlanEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn event_kinds(&self) -> &[EventKind] {
        &self.event_kinds
    }

    #[must_use]
    pub fn exclusivity_groups(&self) -> &[Option<ExclusivityGroup>] {
        &self.exclusivity_groups
    }

    #[must_use]
    pub fn group_roots(&self) -> &[usize] {
        &self.group_roots
    }

    /// Structural description of the plan, comparable across compilations.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EntrySummary {
                phase_number: entry.phase_number,
                label: entry.label.clone(),
                rule: entry.rule.name().to_string(),
                event_kind: self.event_kinds[index],
                exclusivity_group: self.exclusivity_groups[index].as_ref().map(|g| g.as_str().to_string()),
                group_root: self.group_roots[index],
                gates: entry.gates.len(),
                condition_always_valid: entry.condition_always_valid,
                priority: entry.priority,
                strategy: entry.strategy,
            })
            .collect();
        PlanSummary { entries }
    }
}

/// Per-entry line of a [`PlanSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub phase_number: u32,
    pub label: String,
    pub rule: String,
    pub event_kind: EventKind,
    pub exclusivity_group: Option<String>,
    pub group_root: usize,
    pub gates: usize,
    pub condition_always_valid: bool,
    pub priority: Priority,
    pub strategy: ConflictResolutionStrategy,
}

/// Serializable view of a compiled plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub entries: Vec<EntrySummary>,
}

struct Compiler<'a> {
    config: &'a EngineConfig,
    seen: FxHashSet<u32>,
    gates: Vec<StateCondition>,
    plan: DecisionPlan,
}

impl Compiler<'_> {
    fn visit(&mut self, phase: &GamePhase) -> Result<(), EngineError> {
        if !self.seen.insert(phase.number()) {
            return Err(EngineError::InvalidDefinition(format!(
                "duplicate phase number {} ({})",
                phase.number(),
                phase.label()
            )));
        }

        if phase.is_composite() {
            if phase.rule().is_some() {
                return Err(EngineError::InvalidDefinition(format!(
                    "composite phase {} ({}) carries a rule",
                    phase.number(),
                    phase.label()
                )));
            }
            self.gates.push(phase.condition().clone());
            for child in phase.children() {
                self.visit(child)?;
            }
            self.gates.pop();
            return Ok(());
        }

        let Some(rule) = phase.rule() else {
            trace!(phase = phase.number(), "leaf without rule");
            return Ok(());
        };

        let group = if self.config.exclusivity_groups {
            phase
                .exclusivity_group()
                .or_else(|| phase.condition().exclusivity_group())
                .or_else(|| rule.exclusivity_group())
                .cloned()
        } else {
            None
        };
        let always = phase.condition().is_always() && self.gates.iter().all(StateCondition::is_always);

        trace!(
            phase = phase.number(),
            kind = ?rule.event_kind(),
            group = ?group,
            "plan entry"
        );
        self.plan.event_kinds.push(rule.event_kind());
        self.plan.exclusivity_groups.push(group);
        self.plan.entries.push(DecisionPlanEntry {
            phase_number: phase.number(),
            label: phase.label().to_string(),
            gates: self.gates.clone(),
            condition: phase.condition().clone(),
            rule: rule.clone(),
            condition_always_valid: always,
            priority: phase.priority(),
            strategy: phase.strategy(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{CustomNameIs, StateOnly};
    use crate::events::{CustomEvent, MovePieceEvent, RollDiceEvent};
    use crate::rules::{GameEventRule, MovePieceMutator, NullMutator, RollDiceMutator};

    fn custom(name: &str) -> Rule {
        GameEventRule::<CustomEvent>::new(name, CustomNameIs::new(name), NullMutator).into()
    }

    fn tree() -> GamePhase {
        GamePhase::composite(0, "game", StateCondition::Always)
            .with_child(
                GamePhase::composite(10, "turn", StateCondition::dice_rolled("d6"))
                    .with_child(GamePhase::new(11, "move", StateCondition::Always).with_rule(
                        GameEventRule::<MovePieceEvent>::always("move", MovePieceMutator::new()),
                    ))
                    .with_child(GamePhase::new(12, "pass", StateCondition::Always).with_rule(custom("pass"))),
            )
            .with_child(
                GamePhase::new(20, "roll", StateCondition::dice_not_rolled("d6"))
                    .with_rule(GameEventRule::<RollDiceEvent>::always("roll", RollDiceMutator)),
            )
            .with_child(GamePhase::new(30, "idle", StateCondition::Always))
    }

    #[test]
    fn test_depth_first_order_and_kinds() {
        let plan = DecisionPlan::compile(&tree(), &EngineConfig::default()).unwrap();
        let numbers: Vec<_> = plan.entries().iter().map(|e| e.phase_number).collect();
        assert_eq!(numbers, vec![11, 12, 20]);
        assert_eq!(plan.event_kinds(), &[EventKind::Move, EventKind::Custom, EventKind::Roll]);
    }

    #[test]
    fn test_composite_condition_gates_children() {
        let plan = DecisionPlan::compile(&tree(), &EngineConfig::default()).unwrap();
        let mv = plan.entry(0).unwrap();
        assert_eq!(mv.gates.len(), 2);
        assert!(!mv.condition_always_valid);

        let state = GameState::empty();
        let response = mv.is_open(&state);
        assert!(!response.is_valid());
    }

    #[test]
    fn test_duplicate_phase_number_rejected() {
        let root = GamePhase::composite(1, "root", StateCondition::Always)
            .with_child(GamePhase::new(2, "a", StateCondition::Always).with_rule(custom("a")))
            .with_child(GamePhase::new(2, "b", StateCondition::Always).with_rule(custom("b")));
        let err = DecisionPlan::compile(&root, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDefinition(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_composite_with_rule_rejected() {
        let root = GamePhase::new(1, "root", StateCondition::Always)
            .with_child(GamePhase::new(2, "a", StateCondition::Always).with_rule(custom("a")))
            .with_rule(custom("root"));
        assert!(DecisionPlan::compile(&root, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_group_resolution_order() {
        let rule_tagged: Rule = GameEventRule::<CustomEvent>::new("r", CustomNameIs::new("r"), NullMutator)
            .with_exclusivity_group("from-rule")
            .into();
        let condition_tagged: Rule = GameEventRule::<CustomEvent>::new(
            "c",
            StateOnly(StateCondition::Always.with_exclusivity_group("from-event-condition")),
            NullMutator,
        )
        .into();
        let root = GamePhase::composite(0, "root", StateCondition::Always)
            .with_child(
                GamePhase::new(1, "phase", StateCondition::Always.with_exclusivity_group("from-condition"))
                    .with_rule(rule_tagged.clone())
                    .with_exclusivity_group("from-phase"),
            )
            .with_child(
                GamePhase::new(2, "condition", StateCondition::Always.with_exclusivity_group("from-condition"))
                    .with_rule(rule_tagged.clone()),
            )
            .with_child(GamePhase::new(3, "rule", StateCondition::Always).with_rule(rule_tagged))
            .with_child(GamePhase::new(4, "event-condition", StateCondition::Always).with_rule(condition_tagged))
            .with_child(GamePhase::new(5, "none", StateCondition::Always).with_rule(custom("n")));

        let plan = DecisionPlan::compile(&root, &EngineConfig::default()).unwrap();
        let groups: Vec<_> = plan
            .exclusivity_groups()
            .iter()
            .map(|g| g.as_ref().map(|g| g.as_str().to_string()))
            .collect();
        assert_eq!(
            groups,
            vec![
                Some("from-phase".to_string()),
                Some("from-condition".to_string()),
                Some("from-rule".to_string()),
                Some("from-event-condition".to_string()),
                None,
            ]
        );

        let disabled = DecisionPlan::compile(&root, &EngineConfig::default().with_exclusivity_groups(false)).unwrap();
        assert!(disabled.exclusivity_groups().iter().all(Option::is_none));
        assert_eq!(disabled.group_roots(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_group_roots_point_at_first_member() {
        let root = GamePhase::composite(0, "root", StateCondition::Always)
            .with_child(GamePhase::new(1, "a", StateCondition::Always).with_rule(custom("a")))
            .with_child(
                GamePhase::new(2, "b", StateCondition::Always)
                    .with_rule(custom("b"))
                    .with_exclusivity_group("turn"),
            )
            .with_child(GamePhase::new(3, "c", StateCondition::Always).with_rule(custom("c")))
            .with_child(
                GamePhase::new(4, "d", StateCondition::Always)
                    .with_rule(custom("d"))
                    .with_exclusivity_group("turn"),
            );
        let plan = DecisionPlan::compile(&root, &EngineConfig::default()).unwrap();
        assert_eq!(plan.group_roots(), &[0, 1, 2, 1]);
        assert!(plan.entries().iter().all(|e| e.condition_always_valid));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let config = EngineConfig::default();
        let first = DecisionPlan::compile(&tree(), &config).unwrap().summary();
        let second = DecisionPlan::compile(&tree(), &config).unwrap().summary();
        assert_eq!(first, second);

        let json = serde_json::to_string(&first).unwrap();
        let back: PlanSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, first);
        assert_eq!(back.entries[1].rule, "pass");
    }
}
