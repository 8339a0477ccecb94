use indoc::indoc;
use querysmith::{Generator, GeneratorConfig, OperationDocument, OperationKind, TypeGraph};

fn generate(sdl: &str, config: GeneratorConfig) -> Vec<OperationDocument> {
    let graph = TypeGraph::parse(sdl).expect("schema");
    Generator::new(&graph, config).expect("config").documents()
}

fn document<'a>(documents: &'a [OperationDocument], name: &str) -> &'a OperationDocument {
    documents
        .iter()
        .find(|doc| doc.name == name)
        .unwrap_or_else(|| panic!("no document named {name}"))
}

fn max_nesting(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0;
    for ch in text.chars() {
        match ch {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth -= 1,
            _ => {}
        }
    }
    max
}

fn assert_well_formed(text: &str) {
    let mut braces = 0i64;
    let mut parens = 0i64;
    for ch in text.chars() {
        match ch {
            '{' => braces += 1,
            '}' => braces -= 1,
            '(' => parens += 1,
            ')' => parens -= 1,
            _ => {}
        }
        assert!(braces >= 0 && parens >= 0, "unbalanced document:\n{text}");
    }
    assert_eq!((braces, parens), (0, 0), "unbalanced document:\n{text}");

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    for pair in lines.windows(2) {
        assert!(
            !(pair[0].ends_with('{') && pair[1] == "}"),
            "empty selection set in:\n{text}"
        );
    }
}

const SOCIAL: &str = indoc! {"
    type Query {
        user(id: ID!): User
    }

    type User {
        id: ID!
        name: String
        friends: [User]
    }
"};

const GRAPH: &str = indoc! {r#"
    type Query {
        node(id: ID!): Node
        nodes(first: Int, after: String): [Node!]!
        feed: FeedItem
    }

    type Mutation {
        link(from: ID!, to: ID!): Edge
    }

    type Node {
        id: ID!
        label: String
        oldLabel: String @deprecated(reason: "use label")
        outgoing(first: Int): [Edge!]!
        incoming(first: Int): [Edge!]!
        owner: Owner
    }

    type Edge {
        id: ID!
        from: Node!
        to: Node!
        weight(unit: String): Float
    }

    type Owner {
        id: ID!
        nodes(first: Int): [Node!]!
    }

    union FeedItem = Node | Edge | Owner
"#};

#[test]
fn self_referential_type_stops_at_second_edge() {
    let documents = generate(SOCIAL, GeneratorConfig::new().with_depth_limit(3));
    let user = document(&documents, "user");
    let expected = indoc! {"
        query user($id: ID!) {
            user(id: $id) {
                id
                name
                friends {
                    id
                    name
                }
            }
        }"};
    assert_eq!(user.text, expected);
    assert!(user.has_arguments);
    assert_eq!(user.variable_types().get("id").map(String::as_str), Some("ID!"));
}

#[test]
fn union_members_become_inline_fragments() {
    let sdl = indoc! {"
        type Query {
            search(term: String): SearchResult
        }

        union SearchResult = Book | Author | Publisher

        type Book { title: String pages: Int }
        type Author { name: String born: Int }
        type Publisher { address: Address }
        type Address { geo: Geo }
        type Geo { lat: Float }
    "};

    let documents = generate(sdl, GeneratorConfig::new());
    let search = document(&documents, "search");
    assert!(search.text.contains("... on Book {"));
    assert!(search.text.contains("... on Author {"));
    assert!(search.text.contains("... on Publisher {"));

    // publisher's only field is pruned, so its fragment disappears
    let documents = generate(sdl, GeneratorConfig::new().with_depth_limit(1));
    let search = document(&documents, "search");
    let expected = indoc! {"
        query search($term: String) {
            search(term: $term) {
                ... on Book {
                    title
                    pages
                }
                ... on Author {
                    name
                    born
                }
            }
        }"};
    assert_eq!(search.text, expected);
}

#[test]
fn nested_argument_collisions_get_suffixes() {
    let sdl = indoc! {"
        type Query {
            posts(limit: Int): [Post]
        }

        type Post {
            title: String
            comments(limit: Int): [Comment]
        }

        type Comment {
            body: String
        }
    "};

    let documents = generate(sdl, GeneratorConfig::new());
    let posts = document(&documents, "posts");
    let expected = indoc! {"
        query posts($limit: Int, $limit1: Int) {
            posts(limit: $limit) {
                title
                comments(limit: $limit1) {
                    body
                }
            }
        }"};
    assert_eq!(posts.text, expected);
    let variables: Vec<&str> = posts.variables.keys().map(String::as_str).collect();
    assert_eq!(variables, ["limit", "limit1"]);
}

#[test]
fn pruning_the_only_child_drops_the_parent() {
    let sdl = indoc! {"
        type Query {
            account: Account
            status: String
        }

        type Account {
            id: ID
            owner: Owner
        }

        type Owner {
            address: Address
        }

        type Address {
            city: String
        }
    "};

    let documents = generate(sdl, GeneratorConfig::new().with_depth_limit(2));
    let account = document(&documents, "account");
    let expected = indoc! {"
        query account {
            account {
                id
            }
        }"};
    assert_eq!(account.text, expected);

    let sdl = sdl.replace("    id: ID\n", "");
    let documents = generate(&sdl, GeneratorConfig::new().with_depth_limit(1));
    let names: Vec<&str> = documents.iter().map(|doc| doc.name.as_str()).collect();
    assert_eq!(names, ["status"]);
}

#[test]
fn documents_are_well_formed() {
    for depth_limit in 1..=6 {
        for cross_references in [false, true] {
            for deprecated in [false, true] {
                let config = GeneratorConfig::new()
                    .with_depth_limit(depth_limit)
                    .with_cross_references(cross_references)
                    .with_deprecated_fields(deprecated);
                for doc in generate(GRAPH, config) {
                    assert_well_formed(&doc.text);
                }
            }
        }
    }
}

#[test]
fn nesting_never_exceeds_depth_limit() {
    let sdl = indoc! {"
        type Query { chain: Chain }
        type Chain { id: ID next: Chain }
    "};

    for depth_limit in 1..=8 {
        let config = GeneratorConfig::new()
            .with_depth_limit(depth_limit)
            .with_cross_references(true);
        let documents = generate(sdl, config);
        let chain = document(&documents, "chain");
        // one extra level for the operation's own braces
        assert_eq!(max_nesting(&chain.text), depth_limit + 1);
    }
}

#[test]
fn cross_references_only_repeat_when_enabled() {
    let documents = generate(SOCIAL, GeneratorConfig::new().with_depth_limit(6));
    assert_eq!(document(&documents, "user").text.matches("friends").count(), 1);

    let config = GeneratorConfig::new()
        .with_depth_limit(6)
        .with_cross_references(true);
    let documents = generate(SOCIAL, config);
    assert_eq!(document(&documents, "user").text.matches("friends").count(), 5);
}

#[test]
fn variables_are_unique_and_all_used() {
    let config = GeneratorConfig::new()
        .with_depth_limit(5)
        .with_cross_references(true);
    for doc in generate(GRAPH, config) {
        let signature_line = doc.text.lines().next().unwrap_or_default();
        for variable in doc.variables.keys() {
            assert!(signature_line.contains(&format!("${variable}:")));
            let closing = format!("${variable})");
            let separated = format!("${variable},");
            let uses = doc
                .text
                .lines()
                .skip(1)
                .filter(|line| line.contains(&closing) || line.contains(&separated))
                .count();
            assert_eq!(uses, 1, "${variable} should be bound exactly once in:\n{}", doc.text);
        }
    }
}

#[test]
fn output_is_deterministic() {
    let config = GeneratorConfig::new().with_depth_limit(4);
    let first = generate(GRAPH, config.clone());
    let second = generate(GRAPH, config);
    assert_eq!(first, second);
}

#[test]
fn deprecated_fields_follow_the_flag() {
    let documents = generate(GRAPH, GeneratorConfig::new().with_depth_limit(3));
    assert!(documents.iter().all(|doc| !doc.text.contains("oldLabel")));

    let config = GeneratorConfig::new()
        .with_depth_limit(3)
        .with_deprecated_fields(true);
    let documents = generate(GRAPH, config);
    assert!(document(&documents, "node").text.contains("oldLabel"));
}

#[test]
fn mutation_documents_use_the_mutation_keyword() {
    let documents = generate(GRAPH, GeneratorConfig::new().with_depth_limit(2));
    let link = document(&documents, "link");
    assert_eq!(link.kind, OperationKind::Mutation);
    assert!(link.text.starts_with("mutation link($from: ID!, $to: ID!"));
}

#[test]
fn every_union_member_keeps_its_own_fragment() {
    let sdl = indoc! {"
        type Query { pick: Pick }
        union Pick = Left | Right
        type Left { tag: Tag }
        type Right { tag: Tag }
        type Tag { meta: Meta }
        type Meta { id: ID }
    "};
    let documents = generate(sdl, GeneratorConfig::new());
    let pick = document(&documents, "pick");
    assert!(pick.text.contains("... on Left {"));
    assert!(pick.text.contains("... on Right {"));
    assert_eq!(pick.text.matches("meta {").count(), 2);
}
