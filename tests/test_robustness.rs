//! Random inputs built from the characters that matter to the parser.

use qs_value::{Node, RESERVED_NAMES, parse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[&str] = &[
    "a", "b", "0", "1", "9", "[", "]", "[]", "=", "&", "%", "%5B", "%5D", "%2", "+", " ",
    "__proto__", "constructor", "99999999999999999999999",
];

fn random_input(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..40);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn count_leaves(node: &Node) -> usize {
    match node {
        Node::String(_) => 1,
        Node::Sequence(seq) => seq.iter().map(count_leaves).sum(),
        Node::Mapping(map) => map.values().map(count_leaves).sum(),
    }
}

fn assert_no_reserved_keys(node: &Node, input: &str) {
    match node {
        Node::String(_) => {}
        Node::Sequence(seq) => seq.iter().for_each(|n| assert_no_reserved_keys(n, input)),
        Node::Mapping(map) => {
            for (key, value) in map {
                assert!(
                    !RESERVED_NAMES.contains(&key.as_str()),
                    "reserved key {key:?} from {input:?}"
                );
                assert_no_reserved_keys(value, input);
            }
        }
    }
}

#[test]
fn random_inputs_never_fail() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..5_000 {
        let input = random_input(&mut rng);
        let tree = parse(&input);

        assert!(tree.is_mapping(), "root of {input:?} is not a mapping");
        // every leaf comes from a distinct pair
        let pairs = input.split('&').count();
        assert!(
            count_leaves(&tree) <= pairs,
            "{input:?} produced more leaves than pairs: {tree}"
        );
        assert_no_reserved_keys(&tree, &input);
    }
}

#[test]
fn parsing_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let input = random_input(&mut rng);
        assert_eq!(parse(&input), parse(&input), "{input:?}");
    }
}

#[test]
fn huge_indices_stay_small() {
    let input: String = (0..1_000)
        .map(|i| format!("a[{}]=x&a[]=y&", usize::MAX - i))
        .collect();
    let tree = parse(&input);
    assert_eq!(tree["a"].len(), 2_000);
}
