use ripple_core::prelude::*;
use serde_json::json;

struct Label(&'static str);

impl TextSink for Label {
    fn set_text(&self, text: &str) {
        println!("[{}] {}", self.0, text);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data = Value::from(json!({
        "count": 0,
        "todos": [{ "title": "write docs", "done": false }],
        "user": { "name": "Jane" }
    }));
    let (vm, _label) = Instance::mount(data, Label("count"), "count")?;

    vm.watch(
        "todos",
        |todos, _| println!("[todos] {}", todos.to_json()),
        WatchOptions::new().deep(true),
    )?;
    vm.watch(
        "user",
        |user, _| println!("[user] {}", user.to_json()),
        WatchOptions::new().immediate(true),
    )?;

    for _ in 0..3 {
        let next = vm.get("count").as_f64().unwrap_or_default() + 1.0;
        vm.assign("count", next)?;
    }

    let todos = vm.get("todos");
    if let Some(list) = todos.as_array() {
        list.push([Object::from_iter([("title", Value::from("ship")), ("done", Value::from(false))])]);
    }
    vm.set(&todos.member("0"), "done", true)?;

    let user = vm.get("user");
    vm.set(&user, "email", "jane@example.com")?;
    vm.delete(&user, "name")?;

    log::info!("final state: {}", vm.data().to_json());
    Ok(())
}
