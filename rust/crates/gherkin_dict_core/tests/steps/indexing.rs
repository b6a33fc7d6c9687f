use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use gherkin_dict_core::extract_steps;
use gherkin_dict_core::step_index::{build_snapshot, SourceRecord};
use crate::DictWorld;

fn docstring_lines(step: &Step) -> Vec<String> {
    step.docstring
        .clone()
        .unwrap_or_default()
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

// Generic Given: a record whose free text is the DocString
#[given(regex = r#"^a test case "([^"]*)" named "([^"]*)" with text:$"#)]
async fn a_test_case_with_text(world: &mut DictWorld, id: String, name: String, step: &Step) {
    world.records.push(SourceRecord {
        id,
        name,
        text: step.docstring.clone().unwrap_or_default(),
        issue_id: None,
    });
}

#[given(regex = r#"^a test case "([^"]*)" with text:$"#)]
async fn an_unnamed_test_case_with_text(world: &mut DictWorld, id: String, step: &Step) {
    world.records.push(SourceRecord {
        id,
        name: String::new(),
        text: step.docstring.clone().unwrap_or_default(),
        issue_id: None,
    });
}

#[when("we build the step index")]
async fn we_build_the_step_index(world: &mut DictWorld) {
    world.snapshot = Some(build_snapshot(&world.records));
}

#[then(regex = r"^the index contains (\d+) steps?$")]
async fn index_contains(world: &mut DictWorld, n: usize) {
    let snap = world.snapshot.as_ref().expect("index built");
    assert_eq!(snap.steps.len(), n);
}

#[then(regex = r"^the index counts (\d+) test cases?$")]
async fn index_counts_records(world: &mut DictWorld, n: usize) {
    let snap = world.snapshot.as_ref().expect("index built");
    assert_eq!(snap.total_records, n);
}

#[then(regex = r#"^the step "([^"]*)" is used by (\d+) test cases?$"#)]
async fn step_is_used_by(world: &mut DictWorld, text: String, n: usize) {
    let snap = world.snapshot.as_ref().expect("index built");
    let entry = snap
        .steps
        .iter()
        .find(|s| s.step == text)
        .unwrap_or_else(|| panic!("step not found: {text}"));
    assert_eq!(entry.count, n);
    assert_eq!(entry.test_cases.len(), n);
}

#[then(regex = r#"^the step "([^"]*)" references test cases "([^"]*)"$"#)]
async fn step_references(world: &mut DictWorld, text: String, names: String) {
    let snap = world.snapshot.as_ref().expect("index built");
    let entry = snap.steps.iter().find(|s| s.step == text).expect("step present");
    let actual: Vec<&str> = entry.test_cases.iter().map(|tc| tc.name.as_str()).collect();
    let expected: Vec<&str> = names.split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("the index steps are, in order:")]
async fn index_steps_in_order(world: &mut DictWorld, step: &Step) {
    let snap = world.snapshot.as_ref().expect("index built");
    let actual: Vec<&str> = snap.steps.iter().map(|s| s.step.as_str()).collect();
    assert_eq!(actual, docstring_lines(step));
}

#[then("steps are ordered by count then text")]
async fn steps_are_ordered(world: &mut DictWorld) {
    let snap = world.snapshot.as_ref().expect("index built");
    for w in snap.steps.windows(2) {
        let ord = w[1].count.cmp(&w[0].count).then(w[0].step.cmp(&w[1].step));
        assert!(ord != std::cmp::Ordering::Greater, "steps not ordered by (count desc, text)");
    }
}

#[then(regex = r#"^the text of test case "([^"]*)" yields:$"#)]
async fn text_yields(world: &mut DictWorld, id: String, step: &Step) {
    let record = world.records.iter().find(|r| r.id == id).expect("record present");
    let actual: Vec<String> = extract_steps(&record.text).collect();
    assert_eq!(actual, docstring_lines(step));
}

#[then(regex = r#"^the text of test case "([^"]*)" yields nothing$"#)]
async fn text_yields_nothing(world: &mut DictWorld, id: String) {
    let record = world.records.iter().find(|r| r.id == id).expect("record present");
    assert_eq!(extract_steps(&record.text).count(), 0);
}
