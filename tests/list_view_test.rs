// Cached flattened list views: rebuild triggers and sequential queries

use score_tree::{ClassId, NodeId, NodeList, Tree};

const SECTION: ClassId = ClassId(1);
const LINE: ClassId = ClassId(2);
const SYLLABLE: ClassId = ClassId(3);
const BREAK: ClassId = ClassId(4);

fn node(tree: &mut Tree, class_id: ClassId, name: &str, parent: Option<NodeId>) -> NodeId {
    let id = tree.new_node(class_id, name);
    if let Some(parent) = parent {
        tree.add_child(parent, id).unwrap();
    }
    id
}

#[test]
fn test_list_flattens_in_document_order() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let line1 = node(&mut tree, LINE, "Line", Some(section));
    let s1 = node(&mut tree, SYLLABLE, "Syllable", Some(line1));
    let s2 = node(&mut tree, SYLLABLE, "Syllable", Some(line1));
    let line2 = node(&mut tree, LINE, "Line", Some(section));
    let s3 = node(&mut tree, SYLLABLE, "Syllable", Some(line2));

    let mut list = NodeList::new();
    assert_eq!(
        list.get(&mut tree, section),
        &[section, line1, s1, s2, line2, s3]
    );
}

#[test]
fn test_repeated_reads_reuse_the_cache() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let line = node(&mut tree, LINE, "Line", Some(section));
    node(&mut tree, SYLLABLE, "Syllable", Some(line));

    let mut list = NodeList::new();
    list.get(&mut tree, section);
    assert_eq!(list.rebuild_count(), 1);
    list.get(&mut tree, section);
    list.front(&mut tree, section);
    list.back(&mut tree, section);
    assert_eq!(list.rebuild_count(), 1);
}

#[test]
fn test_mutation_below_root_forces_a_rebuild() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let line = node(&mut tree, LINE, "Line", Some(section));

    let mut list = NodeList::new();
    assert_eq!(list.len(&mut tree, section), 2);

    // attaching deep below the root dirties every ancestor
    let extra = node(&mut tree, SYLLABLE, "Syllable", Some(line));
    assert_eq!(list.get(&mut tree, section), &[section, line, extra]);
    assert_eq!(list.rebuild_count(), 2);
}

#[test]
fn test_mutation_elsewhere_leaves_the_cache_alone() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    node(&mut tree, LINE, "Line", Some(section));
    let other = node(&mut tree, SECTION, "Section", None);

    let mut list = NodeList::new();
    list.get(&mut tree, section);
    assert_eq!(list.rebuild_count(), 1);

    node(&mut tree, LINE, "Line", Some(other));
    list.get(&mut tree, section);
    assert_eq!(list.rebuild_count(), 1);
}

#[test]
fn test_filtered_view_keeps_only_accepted_entries() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let line = node(&mut tree, LINE, "Line", Some(section));
    let s1 = node(&mut tree, SYLLABLE, "Syllable", Some(line));
    let br = node(&mut tree, BREAK, "Break", Some(section));
    let s2 = node(&mut tree, SYLLABLE, "Syllable", Some(section));

    // a text-run style view: syllables and breaks, nothing structural
    let mut list = NodeList::with_filter(Box::new(|tree: &Tree, n: NodeId| {
        matches!(
            tree.get(n).map(|node| node.class_id()),
            Some(SYLLABLE) | Some(BREAK)
        )
    }));
    assert_eq!(list.get(&mut tree, section), &[s1, br, s2]);
}

#[test]
fn test_next_and_previous_cross_nesting_boundaries() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let line1 = node(&mut tree, LINE, "Line", Some(section));
    let s1 = node(&mut tree, SYLLABLE, "Syllable", Some(line1));
    let line2 = node(&mut tree, LINE, "Line", Some(section));
    let s2 = node(&mut tree, SYLLABLE, "Syllable", Some(line2));

    let mut list = NodeList::with_filter(Box::new(|tree: &Tree, n: NodeId| {
        tree.get(n).map(|node| node.class_id()) == Some(SYLLABLE)
    }));
    // reading order ignores the line boundary between the two syllables
    assert_eq!(list.next(&mut tree, section, s1), Some(s2));
    assert_eq!(list.previous(&mut tree, section, s2), Some(s1));
    assert_eq!(list.next(&mut tree, section, s2), None);
    assert_eq!(list.previous(&mut tree, section, s1), None);
    assert_eq!(list.index_of(&mut tree, section, s2), Some(1));
}

#[test]
fn test_first_of_class_scans_both_directions() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let s1 = node(&mut tree, SYLLABLE, "Syllable", Some(section));
    let br = node(&mut tree, BREAK, "Break", Some(section));
    let s2 = node(&mut tree, SYLLABLE, "Syllable", Some(section));

    let mut list = NodeList::new();
    assert_eq!(list.first_of_class(&mut tree, section, br, SYLLABLE), Some(s2));
    assert_eq!(
        list.first_of_class_backward(&mut tree, section, br, SYLLABLE),
        Some(s1)
    );
    // the scan includes the start position itself
    assert_eq!(list.first_of_class(&mut tree, section, s1, SYLLABLE), Some(s1));
    assert_eq!(list.first_of_class(&mut tree, section, s2, BREAK), None);
}

#[test]
fn test_vanished_root_yields_an_empty_view() {
    let mut tree = Tree::with_seed(7);
    let section = node(&mut tree, SECTION, "Section", None);
    let scratch = node(&mut tree, SECTION, "Section", None);
    tree.add_child(scratch, section).unwrap();
    tree.delete_child(scratch, section);

    let mut list = NodeList::new();
    assert!(list.get(&mut tree, section).is_empty());
}
