use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use gherkin_dict_core::search::{search, SearchMode};
use crate::DictWorld;

#[given(regex = r#"^the category filter is "([^"]*)"$"#)]
async fn category_filter(world: &mut DictWorld, category: String) {
    world.state.category = category.parse().expect("valid category");
}

#[given(regex = r#"^the sort mode is "([^"]*)"$"#)]
async fn sort_mode(world: &mut DictWorld, sort: String) {
    world.state.sort = sort.parse().expect("valid sort mode");
}

#[given(regex = r#"^the test case filter is "([^"]*)"$"#)]
async fn test_case_filter(world: &mut DictWorld, name: String) {
    world.state.test_case = Some(name);
}

fn run_search(world: &mut DictWorld) {
    let snap = world.snapshot.as_ref().expect("index built");
    let outcome = search(snap, &world.state);
    world.mode = Some(outcome.mode);
    world.results = outcome
        .hits
        .iter()
        .map(|h| (h.entry.step.clone(), h.score))
        .collect();
}

// Single quotes so the query itself can carry "quoted" parameters
#[when(regex = r"^we search for '(.*)'$")]
async fn we_search_for(world: &mut DictWorld, query: String) {
    world.state.query = query;
    run_search(world);
}

#[when("we browse the index")]
async fn we_browse(world: &mut DictWorld) {
    world.state.query.clear();
    run_search(world);
}

#[then(regex = r"^the search is in (browse|query) mode$")]
async fn search_mode(world: &mut DictWorld, mode: String) {
    let expected = if mode == "browse" { SearchMode::Browse } else { SearchMode::Query };
    assert_eq!(world.mode, Some(expected));
}

#[then("the results are:")]
async fn results_are(world: &mut DictWorld, step: &Step) {
    let expected: Vec<String> = step
        .docstring
        .clone()
        .unwrap_or_default()
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    let actual: Vec<&str> = world.results.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(actual, expected);
}

#[then("there are no results")]
async fn no_results(world: &mut DictWorld) {
    assert!(world.results.is_empty(), "unexpected results: {:?}", world.results);
}

#[then(regex = r"^the top result scores (\d+)$")]
async fn top_result_scores(world: &mut DictWorld, expected: u32) {
    let top = world.results.first().expect("at least one result");
    assert_eq!(top.1, Some(expected));
}

#[then(regex = r"^the last result scores (\d+)$")]
async fn last_result_scores(world: &mut DictWorld, expected: u32) {
    let last = world.results.last().expect("at least one result");
    assert_eq!(last.1, Some(expected));
}
