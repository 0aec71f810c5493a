use tree_diagram::{DrawOptions, Node};

fn main() -> tree_diagram::Result<()> {
    let root = Node::new("root");
    for child in 0..2 {
        let branch = Node::new(format!("child{child}"));
        for grandchild in 0..3 {
            branch.new_child(format!("grandchild{grandchild}"));
        }
        root.add_child(&branch)?;
    }
    root.new_child("one")
        .new_child("two")
        .new_child("three")
        .set_color_red()
        .new_child("four")
        .new_child("five");

    for (index, node) in root.generation(2).iter().enumerate() {
        node.new_child(format!("carrot{index}"));
    }
    for (index, node) in root.generation(3).iter().enumerate() {
        node.new_child(format!("banana{index}")).set_color_yellow();
    }

    println!("{}", root.draw());
    println!();
    println!(
        "{}",
        root.draw_options(&DrawOptions::new().border(true).debug(true))
    );
    println!();
    println!(
        "{}",
        root.draw_options(&DrawOptions::new().align_right(true).padding("·····"))
    );

    root.set_padding_all("■")?;
    println!();
    println!("{}", root.child(0).map_or_else(String::new, |child| child.draw()));
    Ok(())
}
