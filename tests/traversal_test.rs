// Control flow, depth budget, filters and visibility in the traversal engine

use score_tree::{
    behavior, ClassId, ClassIdComparison, ClassSpec, Direction, Filters, NodeId, NodeRegistry,
    PredicateComparison, ScoreContext, Traversal, Tree, VisitResult, Visibility, Visitor,
    VisitorMut, UNLIMITED_DEPTH,
};

const PAGE: ClassId = ClassId(1);
const SCORE: ClassId = ClassId(2);
const SCORE_END: ClassId = ClassId(3);
const SUPPLIED: ClassId = ClassId(4); // editorial wrapper
const MEASURE: ClassId = ClassId(5);
const NOTE: ClassId = ClassId(6);
const REST: ClassId = ClassId(7);

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register(ClassSpec::new("Page", PAGE).accepts(|_| true));
    registry.register(
        ClassSpec::new("Score", SCORE)
            .behavior(behavior::SCORE_ROOT)
            .accepts(|_| true),
    );
    registry.register(ClassSpec::new("ScoreEnd", SCORE_END).behavior(behavior::MILESTONE_END));
    registry.register(
        ClassSpec::new("Supplied", SUPPLIED)
            .behavior(behavior::TRANSPARENT | behavior::OPTIONAL_VISIBILITY)
            .accepts(|_| true),
    );
    registry.register(ClassSpec::new("Measure", MEASURE).accepts(|_| true));
    registry.register(ClassSpec::new("Note", NOTE));
    registry.register(ClassSpec::new("Rest", REST));
    registry
}

fn create(registry: &NodeRegistry, tree: &mut Tree, name: &str, parent: Option<NodeId>) -> NodeId {
    let node = registry.create(name, tree).expect("registered class");
    if let Some(parent) = parent {
        tree.add_child(parent, node).expect("supported child");
    }
    node
}

/// Records every entry (and optionally exit) callback in order
struct Recorder {
    entries: Vec<NodeId>,
    exits: Vec<NodeId>,
    skip_at: Option<NodeId>,
    stop_at: Option<NodeId>,
    with_end: bool,
}

impl Recorder {
    fn new() -> Self {
        Recorder {
            entries: Vec::new(),
            exits: Vec::new(),
            skip_at: None,
            stop_at: None,
            with_end: false,
        }
    }
}

impl Visitor for Recorder {
    fn visit(&mut self, _tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        self.entries.push(node);
        if self.stop_at == Some(node) {
            return VisitResult::Stop;
        }
        if self.skip_at == Some(node) {
            return VisitResult::SkipChildren;
        }
        VisitResult::Continue
    }

    fn visit_end(&mut self, _tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        self.exits.push(node);
        VisitResult::Continue
    }

    fn implements_end(&self) -> bool {
        self.with_end
    }
}

#[test]
fn test_forward_traversal_is_preorder() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    let n1 = create(&registry, &mut tree, "Note", Some(m1));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    let n2 = create(&registry, &mut tree, "Note", Some(m2));

    let mut recorder = Recorder::new();
    Traversal::new().run(&tree, page, &mut recorder, UNLIMITED_DEPTH);
    assert_eq!(recorder.entries, vec![page, m1, n1, m2, n2]);
}

#[test]
fn test_backward_traversal_reverses_children() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    let n = create(&registry, &mut tree, "Note", Some(m2));

    let mut recorder = Recorder::new();
    Traversal::new()
        .direction(Direction::Backward)
        .run(&tree, page, &mut recorder, UNLIMITED_DEPTH);
    assert_eq!(recorder.entries, vec![page, m2, n, m1]);
}

#[test]
fn test_skip_children_prunes_subtree_only() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    let hidden = create(&registry, &mut tree, "Note", Some(m1));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    let n2 = create(&registry, &mut tree, "Note", Some(m2));

    let mut recorder = Recorder::new();
    recorder.skip_at = Some(m1);
    Traversal::new().run(&tree, page, &mut recorder, UNLIMITED_DEPTH);

    assert!(recorder.entries.contains(&m1));
    assert!(!recorder.entries.contains(&hidden));
    // siblings and their content are still visited
    assert_eq!(recorder.entries, vec![page, m1, m2, n2]);
}

#[test]
fn test_stop_aborts_everything() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    create(&registry, &mut tree, "Note", Some(m1));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    create(&registry, &mut tree, "Note", Some(m2));

    let mut recorder = Recorder::new();
    recorder.with_end = true;
    recorder.stop_at = Some(m1);
    let mut traversal = Traversal::new();
    traversal.run(&tree, page, &mut recorder, UNLIMITED_DEPTH);

    // no further entry or exit callbacks anywhere after the stop
    assert_eq!(recorder.entries, vec![page, m1]);
    assert!(recorder.exits.is_empty());
    assert_eq!(traversal.result(), VisitResult::Stop);
}

#[test]
fn test_exit_callbacks_nest() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m = create(&registry, &mut tree, "Measure", Some(page));
    let n = create(&registry, &mut tree, "Note", Some(m));

    let mut recorder = Recorder::new();
    recorder.with_end = true;
    Traversal::new().run(&tree, page, &mut recorder, UNLIMITED_DEPTH);

    assert_eq!(recorder.entries, vec![page, m, n]);
    assert_eq!(recorder.exits, vec![n, m, page]);
}

#[test]
fn test_depth_zero_visits_start_only() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    create(&registry, &mut tree, "Measure", Some(page));

    let mut recorder = Recorder::new();
    Traversal::new().run(&tree, page, &mut recorder, 0);
    assert_eq!(recorder.entries, vec![page]);
}

#[test]
fn test_transparent_wrapper_is_depth_neutral() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let measure = create(&registry, &mut tree, "Measure", None);
    let wrapper = create(&registry, &mut tree, "Supplied", Some(measure));
    let note = create(&registry, &mut tree, "Note", Some(wrapper));

    // depth 1 reaches through the wrapper
    let found = tree.find_descendant(measure, &ClassIdComparison::new(NOTE), 1, Direction::Forward);
    assert_eq!(found, Some(note));

    // a non-transparent intermediate consumes the budget
    let other = create(&registry, &mut tree, "Measure", None);
    let inner = create(&registry, &mut tree, "Measure", Some(other));
    let deep = create(&registry, &mut tree, "Note", Some(inner));
    let found = tree.find_descendant(other, &ClassIdComparison::new(NOTE), 1, Direction::Forward);
    assert_eq!(found, None);
    let found = tree.find_descendant(other, &ClassIdComparison::new(NOTE), 2, Direction::Forward);
    assert_eq!(found, Some(deep));
}

#[test]
fn test_unlimited_walk_descends_through_transparent_root() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let wrapper = create(&registry, &mut tree, "Supplied", None);
    let note = create(&registry, &mut tree, "Note", Some(wrapper));
    let inner = create(&registry, &mut tree, "Supplied", Some(wrapper));
    let deep = create(&registry, &mut tree, "Note", Some(inner));

    // starting the walk on a wrapper must not consume the unlimited budget
    let mut recorder = Recorder::new();
    Traversal::new().run(&tree, wrapper, &mut recorder, UNLIMITED_DEPTH);
    assert_eq!(recorder.entries, vec![wrapper, note, inner, deep]);

    assert_eq!(
        tree.find_descendant(wrapper, &ClassIdComparison::new(NOTE), UNLIMITED_DEPTH, Direction::Forward),
        Some(note)
    );
}

#[test]
fn test_filters_reject_child_entirely() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m = create(&registry, &mut tree, "Measure", Some(page));
    let note = create(&registry, &mut tree, "Note", Some(m));
    let rest = create(&registry, &mut tree, "Rest", Some(m));

    let filters = Filters::new().with(Box::new(PredicateComparison::claiming(
        |_: &Tree, _: NodeId| false,
        REST,
    )));
    let mut recorder = Recorder::new();
    Traversal::new()
        .filters(&filters)
        .run(&tree, page, &mut recorder, UNLIMITED_DEPTH);

    assert!(recorder.entries.contains(&note));
    assert!(!recorder.entries.contains(&rest));
}

#[test]
fn test_visible_only_prunes_hidden_content() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let measure = create(&registry, &mut tree, "Measure", None);
    let wrapper = create(&registry, &mut tree, "Supplied", Some(measure));
    let note = create(&registry, &mut tree, "Note", Some(wrapper));
    tree.get_mut(wrapper).unwrap().set_visibility(Visibility::Hidden);

    let mut recorder = Recorder::new();
    Traversal::new().run(&tree, measure, &mut recorder, UNLIMITED_DEPTH);
    // the hidden wrapper is visited, its content is not
    assert_eq!(recorder.entries, vec![measure, wrapper]);

    let mut recorder = Recorder::new();
    Traversal::new()
        .visible_only(false)
        .run(&tree, measure, &mut recorder, UNLIMITED_DEPTH);
    assert_eq!(recorder.entries, vec![measure, wrapper, note]);
}

/// Records which score the engine reports at each visited node
struct ScoreProbe {
    seen: Vec<(NodeId, Option<NodeId>)>,
}

impl Visitor for ScoreProbe {
    fn visit(&mut self, _tree: &Tree, node: NodeId, ctx: &ScoreContext) -> VisitResult {
        self.seen.push((node, ctx.current_score()));
        VisitResult::Continue
    }
}

#[test]
fn test_score_context_forward() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let score1 = create(&registry, &mut tree, "Score", Some(page));
    let m1 = create(&registry, &mut tree, "Measure", Some(score1));
    let score2 = create(&registry, &mut tree, "Score", Some(page));
    let m2 = create(&registry, &mut tree, "Measure", Some(score2));

    let mut probe = ScoreProbe { seen: Vec::new() };
    Traversal::new().run(&tree, page, &mut probe, UNLIMITED_DEPTH);

    let lookup = |node: NodeId| probe.seen.iter().find(|(n, _)| *n == node).unwrap().1;
    assert_eq!(lookup(m1), Some(score1));
    assert_eq!(lookup(m2), Some(score2));
    assert_eq!(lookup(page), None);
}

#[test]
fn test_score_context_backward_through_end_marker() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let score = create(&registry, &mut tree, "Score", Some(page));
    let end = create(&registry, &mut tree, "ScoreEnd", None);
    tree.add_child(page, end).unwrap();
    tree.get_mut(end).unwrap().set_paired_start(Some(score));
    let tail = create(&registry, &mut tree, "Measure", Some(page));

    let mut probe = ScoreProbe { seen: Vec::new() };
    Traversal::new()
        .direction(Direction::Backward)
        .run(&tree, page, &mut probe, UNLIMITED_DEPTH);

    // walking backward, the end marker re-establishes its score
    let lookup = |node: NodeId| probe.seen.iter().find(|(n, _)| *n == node).unwrap().1;
    assert_eq!(lookup(tail), None);
    assert_eq!(lookup(end), Some(score));
}

/// Moves every note it meets into a collection measure, pruning the moved
/// subtree from further descent
struct GatherNotes {
    target: NodeId,
}

impl VisitorMut for GatherNotes {
    fn visit(&mut self, tree: &mut Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if node == self.target {
            return VisitResult::SkipChildren;
        }
        if tree.get(node).map(|n| n.class_id()) == Some(NOTE) {
            tree.move_node_to(node, self.target).expect("move should succeed");
            return VisitResult::SkipChildren;
        }
        VisitResult::Continue
    }
}

#[test]
fn test_mutating_traversal_reparents_safely() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    let n1 = create(&registry, &mut tree, "Note", Some(m1));
    let n2 = create(&registry, &mut tree, "Note", Some(m1));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    let n3 = create(&registry, &mut tree, "Note", Some(m2));
    let target = create(&registry, &mut tree, "Measure", Some(page));

    let mut gather = GatherNotes { target };
    Traversal::new().run_mut(&mut tree, page, &mut gather, UNLIMITED_DEPTH);
    tree.clear_relinquished_children(m1);
    tree.clear_relinquished_children(m2);

    assert_eq!(tree.get(target).unwrap().children(), &[n1, n2, n3]);
    assert!(tree.get(m1).unwrap().children().is_empty());
    assert!(tree.get(m2).unwrap().children().is_empty());
    for &n in &[n1, n2, n3] {
        assert_eq!(tree.get(n).unwrap().parent(), Some(target));
    }
}

#[test]
fn test_find_next_and_previous_child() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m1 = create(&registry, &mut tree, "Measure", Some(page));
    let n1 = create(&registry, &mut tree, "Note", Some(m1));
    let m2 = create(&registry, &mut tree, "Measure", Some(page));
    let n2 = create(&registry, &mut tree, "Note", Some(m2));

    let comparison = ClassIdComparison::new(NOTE);
    // crosses the measure boundary in document order
    assert_eq!(tree.find_next_child(page, &comparison, n1), Some(n2));
    assert_eq!(tree.find_previous_child(page, &comparison, n2), Some(n1));
    assert_eq!(tree.find_next_child(page, &comparison, n2), None);
    assert_eq!(tree.find_previous_child(page, &comparison, n1), None);
}

#[test]
fn test_find_all_descendants_outermost_only() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let outer = create(&registry, &mut tree, "Supplied", Some(page));
    let inner = create(&registry, &mut tree, "Supplied", Some(outer));
    let sibling = create(&registry, &mut tree, "Supplied", Some(page));

    let comparison = ClassIdComparison::new(SUPPLIED);
    let outermost = tree.find_all_descendants(page, &comparison, UNLIMITED_DEPTH, true);
    assert_eq!(outermost, vec![outer, sibling]);

    let all = tree.find_all_descendants(page, &comparison, UNLIMITED_DEPTH, false);
    assert_eq!(all, vec![outer, inner, sibling]);
}

#[test]
fn test_find_descendant_by_id() {
    let registry = registry();
    let mut tree = Tree::with_seed(1);
    let page = create(&registry, &mut tree, "Page", None);
    let m = create(&registry, &mut tree, "Measure", Some(page));
    let n = create(&registry, &mut tree, "Note", Some(m));
    let id = tree.get(n).unwrap().id().to_string();

    assert_eq!(
        tree.find_descendant_by_id(page, &id, UNLIMITED_DEPTH, Direction::Forward),
        Some(n)
    );
    assert_eq!(
        tree.find_descendant_by_id(page, "missing", UNLIMITED_DEPTH, Direction::Forward),
        None
    );
}
