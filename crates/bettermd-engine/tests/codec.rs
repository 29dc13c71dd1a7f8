use bettermd_engine::editing::toggle_format;
use bettermd_engine::models::{
    Block, BlockKind, Document, InlineLeaf, Mark, Marks, PLACEHOLDER_TEXT, Selection,
};
use bettermd_engine::parsing::{EncodeError, decode, encode};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn kinds(doc: &Document) -> Vec<BlockKind> {
    doc.blocks().iter().map(|b| b.kind).collect()
}

fn texts(doc: &Document) -> Vec<String> {
    doc.blocks().iter().map(Block::text).collect()
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t \n")]
fn blank_input_decodes_to_placeholder(#[case] input: &str) {
    let doc = decode(input);
    assert_eq!(kinds(&doc), vec![BlockKind::Paragraph]);
    assert_eq!(texts(&doc), vec![PLACEHOLDER_TEXT]);
}

#[test]
fn heading_decodes_and_encodes() {
    let doc = decode("# Title");
    assert_eq!(kinds(&doc), vec![BlockKind::Heading1]);
    assert_eq!(texts(&doc), vec!["Title"]);
    assert_eq!(encode(&doc).unwrap(), "# Title");
}

#[rstest]
#[case("- item")]
#[case("* item")]
fn list_markers_normalize_to_dash(#[case] input: &str) {
    let doc = decode(input);
    assert_eq!(kinds(&doc), vec![BlockKind::ListItem]);
    assert_eq!(texts(&doc), vec!["item"]);
    assert_eq!(encode(&doc).unwrap(), "- item");
}

#[test]
fn bold_line_stays_a_literal_paragraph() {
    let doc = decode("**bold line**");
    assert_eq!(kinds(&doc), vec![BlockKind::Paragraph]);
    assert_eq!(texts(&doc), vec!["**bold line**"]);
}

#[test]
fn mixed_document_decodes_line_by_line() {
    let doc = decode("# One\n## Two\n### Three\n- a\n* b\nplain\n> quoted");

    assert_eq!(
        kinds(&doc),
        vec![
            BlockKind::Heading1,
            BlockKind::Heading2,
            BlockKind::Heading3,
            BlockKind::ListItem,
            BlockKind::ListItem,
            BlockKind::Paragraph,
            BlockKind::Paragraph,
        ]
    );
    assert_eq!(
        texts(&doc),
        vec!["One", "Two", "Three", "a", "b", "plain", "> quoted"]
    );
}

fn sample_documents() -> Vec<Document> {
    let kinds = [
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Heading3,
        BlockKind::ListItem,
        BlockKind::Paragraph,
        BlockKind::BlockQuote,
    ];
    let words = [
        "Title",
        "two words",
        "**strong**",
        "- dash",
        "* star",
        "# hash",
        "carriage\r",
        "x",
    ];

    let mut docs = Vec::new();
    for (i, kind) in kinds.iter().enumerate() {
        for (j, word) in words.iter().enumerate() {
            let next = kinds[(i + j + 1) % kinds.len()];
            docs.push(Document::new(vec![
                Block::new(*kind, *word),
                Block::new(next, words[(i + j) % words.len()]),
            ]));
        }
    }
    docs
}

fn reencode(text: &str) -> String {
    encode(&decode(text)).unwrap()
}

#[test]
fn reencoding_is_idempotent() {
    for doc in sample_documents() {
        let text = encode(&doc).unwrap();
        let once = reencode(&text);
        let twice = reencode(&once);
        assert_eq!(twice, once, "not idempotent for {text:?}");
    }
}

#[rstest]
#[case(Block::paragraph("* x"), "* x", "- x")]
#[case(Block::paragraph("x\r"), "x\r", "x")]
#[case(Block::new(BlockKind::BlockQuote, "* x"), "> * x", "> * x")]
fn encoded_text_can_change_on_first_reencode(
    #[case] block: Block,
    #[case] encoded: &str,
    #[case] reencoded: &str,
) {
    let text = encode(&Document::new(vec![block])).unwrap();

    assert_eq!(text, encoded);
    assert_eq!(reencode(&text), reencoded);
    assert_eq!(reencode(reencoded), reencoded);
}

#[test]
fn empty_block_is_an_encode_error() {
    let mut empty = Block::paragraph("");
    empty.children.clear();
    let doc = Document::new(vec![Block::paragraph("ok"), empty]);

    assert_eq!(encode(&doc), Err(EncodeError::EmptyBlock { index: 1 }));
}

#[rstest]
#[case(0, 5)]
#[case(2, 7)]
#[case(6, 11)]
#[case(0, 11)]
fn toggling_a_mark_twice_restores_the_document(#[case] start: usize, #[case] end: usize) {
    let doc = Document::new(vec![
        Block::new(BlockKind::Heading1, "Hello world"),
        Block::paragraph("second"),
    ]);
    let sel = Selection::within_block(0, start, end);

    for mark in Mark::ALL {
        let once = toggle_format(&doc, &sel, mark).unwrap();
        assert_ne!(once, doc);
        let twice = toggle_format(&once, &sel, mark).unwrap();
        assert_eq!(twice, doc, "{mark:?} over {start}..{end}");
    }
}

#[test]
fn toggling_inside_a_marked_leaf_restores_it() {
    let bold = Marks {
        bold: true,
        ..Marks::default()
    };
    let doc = Document::new(vec![Block {
        kind: BlockKind::Paragraph,
        children: vec![
            InlineLeaf::plain("a "),
            InlineLeaf::with_marks("bold", bold),
            InlineLeaf::plain(" b"),
        ],
    }]);
    let sel = Selection::within_block(0, 3, 5);

    let once = toggle_format(&doc, &sel, Mark::Bold).unwrap();
    let twice = toggle_format(&once, &sel, Mark::Bold).unwrap();

    assert_eq!(twice, doc);
}

#[test]
fn slate_json_survives_a_round_trip() {
    let doc = decode("# Title\n- item");
    let json = doc.to_json().unwrap();
    assert_eq!(Document::from_json(&json).unwrap(), doc);
}
