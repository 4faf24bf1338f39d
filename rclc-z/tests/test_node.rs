use rclc_z::allocator::Allocator;
use rclc_z::init::{Support, support_fini, support_init};
use rclc_z::node::{node_init_default, node_init_with_options};
use rclc_z::rcl::{Node, NodeOptions};
use rclc_z::ret::RetCode;

struct TestNodeFixture<'a> {
    support: Support<'a>,
}

impl<'a> TestNodeFixture<'a> {
    fn new(allocator: &'a Allocator, args: &[&str]) -> Self {
        let mut support = Support::default();
        support_init(&mut support, args, allocator).unwrap();
        Self { support }
    }
}

impl Drop for TestNodeFixture<'_> {
    fn drop(&mut self) {
        let _ = support_fini(&mut self.support);
    }
}

#[test]
fn test_node_init_default() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(&allocator, &[]);

    let mut node = Node::default();
    node_init_default(&mut node, "talker", "", &fixture.support).unwrap();
    assert!(node.is_valid());
    assert_eq!(node.name(), Some("talker"));
    assert_eq!(node.namespace(), Some("/"));
    assert_eq!(node.fully_qualified_name().as_deref(), Some("/talker"));
    node.fini().unwrap();
    assert!(!node.is_valid());
}

#[test]
fn test_node_namespace_is_normalized() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(&allocator, &[]);

    let mut node = Node::default();
    node_init_default(&mut node, "talker", "robot1", &fixture.support).unwrap();
    assert_eq!(node.namespace(), Some("/robot1"));
    assert_eq!(node.fully_qualified_name().as_deref(), Some("/robot1/talker"));
    assert_eq!(node.resolve_topic_name("chatter").unwrap(), "/robot1/chatter");
    assert_eq!(node.resolve_topic_name("~/status").unwrap(), "/robot1/talker/status");
    assert_eq!(node.resolve_topic_name("/abs").unwrap(), "/abs");
    node.fini().unwrap();
}

#[test]
fn test_node_invalid_arguments() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(&allocator, &[]);

    let mut node = Node::default();
    let err = node_init_default(&mut node, "", "", &fixture.support).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);

    let err = node_init_default(&mut node, "bad name", "", &fixture.support).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);

    let err = node_init_default(&mut node, "talker", "/bad//ns", &fixture.support).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);
    assert!(!node.is_valid());

    let dead = Support::default();
    let err = node_init_default(&mut node, "talker", "", &dead).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);
}

#[test]
fn test_node_fini_twice() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(&allocator, &[]);

    let mut node = Node::default();
    node_init_default(&mut node, "talker", "", &fixture.support).unwrap();
    node.fini().unwrap();
    assert_eq!(node.fini().unwrap_err().code(), RetCode::Error);
    assert_eq!(
        node_init_default(&mut node, "talker", "", &fixture.support)
            .unwrap_err()
            .code(),
        RetCode::Error
    );
}

#[test]
fn test_node_global_remap() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(
        &allocator,
        &[
            "prog",
            "--ros-args",
            "-r",
            "__node:=renamed",
            "-r",
            "__ns:=/remapped",
            "-r",
            "chatter:=talk",
        ],
    );

    let mut node = Node::default();
    node_init_default(&mut node, "talker", "", &fixture.support).unwrap();
    assert_eq!(node.name(), Some("renamed"));
    assert_eq!(node.namespace(), Some("/remapped"));
    assert_eq!(node.resolve_topic_name("chatter").unwrap(), "/remapped/talk");
    node.fini().unwrap();
}

#[test]
fn test_node_local_arguments() {
    let allocator = Allocator::new();
    let fixture = TestNodeFixture::new(&allocator, &["prog", "--ros-args", "-r", "__node:=global"]);

    let local = NodeOptions {
        arguments: vec!["--ros-args".into(), "-r".into(), "__node:=local".into()],
        ..Default::default()
    };
    let mut node = Node::default();
    node_init_with_options(&mut node, "talker", "", &fixture.support, &local).unwrap();
    assert_eq!(node.name(), Some("local"));
    node.fini().unwrap();

    let isolated = NodeOptions {
        use_global_arguments: false,
        ..Default::default()
    };
    let mut node = Node::default();
    node_init_with_options(&mut node, "talker", "", &fixture.support, &isolated).unwrap();
    assert_eq!(node.name(), Some("talker"));
    node.fini().unwrap();
}
