//! End-to-end pipeline tests: markup in, styled and measured tree out.

use vellum::{ElementData, Node, ParseError, Parser, parse_document};

fn element<'a>(node: &'a Node, index: usize) -> &'a ElementData {
    node.children[index].as_element().expect("expected element")
}

fn count_elements(node: &Node) -> usize {
    let own = usize::from(node.is_element());
    own + node.children.iter().map(count_elements).sum::<usize>()
}

#[test]
fn space_between_layout_from_markup() {
    let doc = parse_document(
        "<style>\
           #box { display: flex; width: 800px; justify-content: space-between }\
           .item { width: 100px; height: 40px }\
           #mid { width: 200px }\
         </style>\
         <div id=\"box\">\
           <a class=\"item\"></a>\
           <b class=\"item\" id=\"mid\"></b>\
           <c class=\"item\"></c>\
         </div>",
    )
    .unwrap();

    let box_node = &doc.children[1];
    // The id rule out-ranks the class rule, so the middle item is 200 wide;
    // leftover = 800 - 400, spread as two gaps of 200.
    let a = element(box_node, 0).layout_box.unwrap();
    let b = element(box_node, 1).layout_box.unwrap();
    let c = element(box_node, 2).layout_box.unwrap();
    assert_eq!(a.left, Some(0.0));
    assert_eq!(a.right, Some(100.0));
    assert_eq!(b.left, Some(300.0));
    assert_eq!(b.right, Some(500.0));
    assert_eq!(c.left, Some(700.0));
    assert_eq!(c.right, Some(800.0));
}

#[test]
fn overflow_scales_children_to_container() {
    let doc = parse_document(
        "<style>\
           main { display: flex; width: 400px }\
           main b { width: 300px }\
         </style>\
         <main><b></b><b></b></main>",
    )
    .unwrap();

    let main_node = &doc.children[1];
    let first = element(main_node, 0).layout_box.unwrap();
    let second = element(main_node, 1).layout_box.unwrap();
    assert_eq!(first.width, Some(200.0));
    assert_eq!(second.width, Some(200.0));
    assert_eq!(first.left, Some(0.0));
    assert_eq!(second.right, Some(400.0));
}

#[test]
fn equal_specificity_keeps_the_earlier_rule() {
    let doc = parse_document(
        "<style>p { color: red } p { color: green }</style><p></p>",
    )
    .unwrap();
    assert_eq!(element(&doc, 1).style_value("color"), Some("red"));
}

#[test]
fn nested_flex_container_feeds_its_size_upward() {
    let doc = parse_document(
        "<style>\
           #outer { display: flex; width: 300px }\
           #inner { display: flex }\
           #inner i { width: 60px }\
           #inner u { width: 40px }\
           b { width: 50px }\
         </style>\
         <div id=\"outer\"><div id=\"inner\"><i></i><u></u></div><b></b></div>",
    )
    .unwrap();

    let outer_node = &doc.children[1];
    let inner_node = &outer_node.children[0];

    // The inner container is auto-sized to 100 by its own pass.
    let inner_box = element(outer_node, 0).layout_box.unwrap();
    assert_eq!(inner_box.width, Some(100.0));
    assert_eq!(inner_box.left, Some(0.0));
    assert_eq!(inner_box.right, Some(100.0));

    let i_box = element(inner_node, 0).layout_box.unwrap();
    let u_box = element(inner_node, 1).layout_box.unwrap();
    assert_eq!(i_box.right, Some(60.0));
    assert_eq!(u_box.right, Some(100.0));

    let b_box = element(outer_node, 1).layout_box.unwrap();
    assert_eq!(b_box.left, Some(100.0));
    assert_eq!(b_box.right, Some(150.0));
}

#[test]
fn non_flex_elements_get_no_layout_box() {
    let doc = parse_document("<div><span></span></div>").unwrap();
    assert!(element(&doc, 0).layout_box.is_none());
    assert!(element(&doc.children[0], 0).layout_box.is_none());
}

#[test]
fn element_count_and_text_survive_parsing() {
    let doc = parse_document("<x>hello <y>world</y>!</x>").unwrap();
    assert_eq!(count_elements(&doc), 2);
    assert_eq!(doc.text_content(), "hello world!");
}

#[test]
fn mismatched_tags_abort_the_parse() {
    let err = parse_document("<a><b></a>").unwrap_err();
    assert!(matches!(err, ParseError::TagMismatch { .. }));
}

#[test]
fn script_content_is_not_parsed_as_markup() {
    let doc = parse_document("<script>var a = '<div>';</script>").unwrap();
    assert_eq!(count_elements(&doc), 1);
    assert_eq!(doc.text_content(), "var a = '<div>';");
}

#[test]
fn unterminated_markup_still_yields_the_open_tree() {
    let doc = parse_document("<a><b>partial").unwrap();
    assert_eq!(count_elements(&doc), 2);
    assert_eq!(doc.text_content(), "partial");
    assert!(element(&doc, 0).layout_box.is_none());
}

#[test]
fn caller_supplied_sheet_is_active_from_the_start() {
    let mut parser = Parser::new();
    parser
        .register_sheet("div { display: flex; width: 120px }")
        .unwrap();
    let doc = parser.parse("<div><p></p></div>").unwrap();
    let own = element(&doc, 0).layout_box.unwrap();
    assert_eq!(own.width, Some(120.0));
}
