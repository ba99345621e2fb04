use encyclopedia::domain::comment::NewComment;
use encyclopedia::domain::entry::EntryChanges;
use encyclopedia::domain::types::{
    CommentContent, EntryContent, EntryStatus, EntryTitle, TagId, UserId, Username,
};
use encyclopedia::domain::user::NewUser;
use encyclopedia::repository::errors::RepositoryError;
use encyclopedia::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, EntryListQuery, EntryReader,
    EntryWriter, TagReader, UserReader, UserWriter,
};

mod common;

use common::{EntrySeed, at, create_category, create_tag, create_user};

fn changes(status: EntryStatus, tag_ids: Vec<TagId>) -> EntryChanges {
    EntryChanges {
        title: EntryTitle::new("Edited").expect("valid title"),
        content: EntryContent::new("Edited body").expect("valid content"),
        summary: None,
        category_id: None,
        status,
        tag_ids,
    }
}

fn titles(repo: &encyclopedia::repository::DieselRepository, query: EntryListQuery) -> Vec<String> {
    let (_, entries) = repo.list_entries(query).expect("should list entries");
    entries
        .into_iter()
        .map(|v| v.entry.title.into_inner())
        .collect()
}

#[test]
fn duplicate_username_is_a_conflict() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let alice = create_user(&repo, "alice");
    let found = repo
        .get_user_by_username(&Username::new("alice").unwrap())
        .expect("should query user")
        .expect("user should exist");
    assert_eq!(found.id, alice.id);

    let err = repo
        .create_user(&NewUser {
            username: Username::new("alice").unwrap(),
            password_hash: "other".into(),
            created_at: at(1),
        })
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[test]
fn publication_time_is_stamped_once() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    let draft = EntrySeed::new("Draft", EntryStatus::Draft, alice.id, 10).insert(&repo);
    assert_eq!(draft.published_at, None);

    let published = repo
        .update_entry(draft.id, alice.id, &changes(EntryStatus::Published, vec![]), at(20))
        .expect("should update")
        .expect("entry should exist");
    assert_eq!(published.published_at, Some(at(20)));
    assert_eq!(published.updated_at, at(20));

    for (status, when) in [(EntryStatus::Archived, 30), (EntryStatus::Published, 40)] {
        let saved = repo
            .update_entry(draft.id, alice.id, &changes(status, vec![]), at(when))
            .expect("should update")
            .expect("entry should exist");
        assert_eq!(saved.published_at, Some(at(20)));
    }

    let stored = repo
        .get_entry_for_author(draft.id, alice.id)
        .expect("should load entry")
        .expect("entry should exist");
    assert_eq!(stored.entry.published_at, Some(at(20)));
    assert_eq!(stored.entry.updated_at, at(40));
    assert_eq!(stored.entry.title.as_str(), "Edited");
}

#[test]
fn created_published_entry_is_stamped() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    let entry = EntrySeed::new("Live", EntryStatus::Published, alice.id, 5).insert(&repo);
    assert_eq!(entry.published_at, Some(at(5)));
}

#[test]
fn listing_returns_published_entries_newest_first() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    EntrySeed::new("A", EntryStatus::Published, alice.id, 1).insert(&repo);
    EntrySeed::new("B", EntryStatus::Published, alice.id, 2).insert(&repo);
    EntrySeed::new("C", EntryStatus::Draft, alice.id, 3).insert(&repo);
    EntrySeed::new("D", EntryStatus::Archived, alice.id, 4).insert(&repo);

    assert_eq!(titles(&repo, EntryListQuery::published()), vec!["B", "A"]);
    assert_eq!(
        titles(&repo, EntryListQuery::default().author(alice.id)),
        vec!["D", "C", "B", "A"]
    );
}

#[test]
fn filters_intersect_without_duplicates() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let languages = create_category(&repo, "Languages");
    let tools = create_category(&repo, "Tools");
    let systems = create_tag(&repo, "systems");
    let web = create_tag(&repo, "web");

    EntrySeed::new("Rust", EntryStatus::Published, alice.id, 1)
        .category(languages.id)
        .tags(vec![systems.id, web.id, systems.id])
        .insert(&repo);
    EntrySeed::new("Cargo", EntryStatus::Published, alice.id, 2)
        .content("The RUST build tool")
        .category(tools.id)
        .tags(vec![systems.id])
        .insert(&repo);
    EntrySeed::new("Go", EntryStatus::Published, alice.id, 3)
        .category(languages.id)
        .tags(vec![systems.id])
        .insert(&repo);
    EntrySeed::new("Rust 2", EntryStatus::Draft, alice.id, 4)
        .category(languages.id)
        .tags(vec![systems.id])
        .insert(&repo);

    assert_eq!(
        titles(&repo, EntryListQuery::published().search("rust")),
        vec!["Cargo", "Rust"]
    );
    assert_eq!(
        titles(&repo, EntryListQuery::published().tag(systems.id)),
        vec!["Go", "Cargo", "Rust"]
    );
    assert_eq!(
        titles(
            &repo,
            EntryListQuery::published()
                .search("rust")
                .category(languages.id)
                .tag(systems.id)
        ),
        vec!["Rust"]
    );

    let (_, rust) = repo
        .list_entries(EntryListQuery::published().search("Rust").category(languages.id))
        .expect("should list entries");
    let tag_names: Vec<&str> = rust[0].tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, vec!["systems", "web"]);
    assert_eq!(rust[0].author_name.as_str(), "alice");
    assert_eq!(
        rust[0].category.as_ref().map(|c| c.name.as_str()),
        Some("Languages")
    );
}

#[test]
fn search_treats_wildcards_literally() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    EntrySeed::new("100% safe", EntryStatus::Published, alice.id, 1).insert(&repo);
    EntrySeed::new("100 safe", EntryStatus::Published, alice.id, 2).insert(&repo);
    EntrySeed::new("snake_case", EntryStatus::Published, alice.id, 3).insert(&repo);
    EntrySeed::new("snakeXcase", EntryStatus::Published, alice.id, 4).insert(&repo);

    assert_eq!(
        titles(&repo, EntryListQuery::published().search("100%")),
        vec!["100% safe"]
    );
    assert_eq!(
        titles(&repo, EntryListQuery::published().search("e_c")),
        vec!["snake_case"]
    );
}

#[test]
fn search_folds_non_ascii_case() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    EntrySeed::new("Привет, мир", EntryStatus::Published, alice.id, 1).insert(&repo);
    EntrySeed::new("Summer", EntryStatus::Published, alice.id, 2)
        .content("Notes from the été festival")
        .insert(&repo);
    EntrySeed::new("Unrelated", EntryStatus::Published, alice.id, 3).insert(&repo);

    assert_eq!(
        titles(&repo, EntryListQuery::published().search("ПРИВЕТ")),
        vec!["Привет, мир"]
    );
    assert_eq!(
        titles(&repo, EntryListQuery::published().search("ÉTÉ")),
        vec!["Summer"]
    );
}

#[test]
fn equal_timestamps_page_by_descending_id() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    let mut ids: Vec<i32> = (1..=12)
        .map(|i| {
            EntrySeed::new(&format!("Entry {i}"), EntryStatus::Published, alice.id, 100)
                .insert(&repo)
                .id
                .get()
        })
        .collect();
    ids.sort_unstable_by(|a, b| b.cmp(a));

    let page_ids = |page: usize| -> Vec<i32> {
        let (_, entries) = repo
            .list_entries(EntryListQuery::published().paginate(page, 10))
            .expect("should list entries");
        entries.into_iter().map(|v| v.entry.id.get()).collect()
    };

    let first = page_ids(1);
    let second = page_ids(2);
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 2);

    let combined: Vec<i32> = first.into_iter().chain(second).collect();
    assert_eq!(combined, ids);
}

#[test]
fn out_of_range_page_returns_last_page() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    for i in 1..=25 {
        EntrySeed::new(&format!("Entry {i}"), EntryStatus::Published, alice.id, i).insert(&repo);
    }

    let (total, last) = repo
        .list_entries(EntryListQuery::published().paginate(99, 10))
        .expect("should list entries");
    assert_eq!(total, 25);
    assert_eq!(last.len(), 5);
    assert_eq!(last[0].entry.title.as_str(), "Entry 5");

    let (_, first) = repo
        .list_entries(EntryListQuery::published().paginate(0, 10))
        .expect("should list entries");
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].entry.title.as_str(), "Entry 25");
}

#[test]
fn each_view_is_counted() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let live = EntrySeed::new("Live", EntryStatus::Published, alice.id, 1).insert(&repo);
    let draft = EntrySeed::new("Draft", EntryStatus::Draft, alice.id, 2).insert(&repo);

    for n in 1..=3 {
        let view = repo
            .view_published_entry(live.id)
            .expect("should count view")
            .expect("published entry should be visible");
        assert_eq!(view.entry.view_count, n);
    }

    assert!(
        repo.view_published_entry(draft.id)
            .expect("should query entry")
            .is_none()
    );
    let stored = repo
        .get_entry_for_author(draft.id, alice.id)
        .expect("should load entry")
        .expect("entry should exist");
    assert_eq!(stored.entry.view_count, 0);
}

#[test]
fn likes_count_on_published_entries_only() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let live = EntrySeed::new("Live", EntryStatus::Published, alice.id, 1).insert(&repo);
    let draft = EntrySeed::new("Draft", EntryStatus::Draft, alice.id, 2).insert(&repo);

    assert_eq!(repo.like_published_entry(live.id).unwrap(), 1);
    assert_eq!(repo.like_published_entry(live.id).unwrap(), 1);
    assert_eq!(repo.like_published_entry(draft.id).unwrap(), 0);

    let stored = repo
        .get_published_entry(live.id)
        .expect("should load entry")
        .expect("entry should exist");
    assert_eq!(stored.like_count, 2);
    assert_eq!(stored.view_count, 0);
}

#[test]
fn only_the_author_can_change_an_entry() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let bob = create_user(&repo, "bob");
    let entry = EntrySeed::new("Mine", EntryStatus::Published, alice.id, 1).insert(&repo);

    assert!(repo.get_entry_for_author(entry.id, bob.id).unwrap().is_none());
    assert!(
        repo.update_entry(entry.id, bob.id, &changes(EntryStatus::Draft, vec![]), at(9))
            .unwrap()
            .is_none()
    );
    assert_eq!(repo.delete_entry(entry.id, bob.id).unwrap(), 0);

    let stored = repo.get_published_entry(entry.id).unwrap().unwrap();
    assert_eq!(stored.title.as_str(), "Mine");

    assert_eq!(repo.delete_entry(entry.id, alice.id).unwrap(), 1);
    assert!(repo.get_published_entry(entry.id).unwrap().is_none());
}

#[test]
fn updating_replaces_tag_set() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let systems = create_tag(&repo, "systems");
    let web = create_tag(&repo, "web");
    let entry = EntrySeed::new("Rust", EntryStatus::Draft, alice.id, 1)
        .tags(vec![systems.id])
        .insert(&repo);

    repo.update_entry(
        entry.id,
        alice.id,
        &changes(EntryStatus::Draft, vec![web.id, web.id]),
        at(2),
    )
    .expect("should update")
    .expect("entry should exist");

    let stored = repo.get_entry_for_author(entry.id, alice.id).unwrap().unwrap();
    let tag_ids: Vec<TagId> = stored.tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids, vec![web.id]);
}

#[test]
fn deleting_category_keeps_entries() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let languages = create_category(&repo, "Languages");
    let entry = EntrySeed::new("Rust", EntryStatus::Published, alice.id, 1)
        .category(languages.id)
        .insert(&repo);

    assert_eq!(repo.delete_category(languages.id).unwrap(), 1);
    assert!(repo.get_category_by_id(languages.id).unwrap().is_none());

    let stored = repo.get_published_entry(entry.id).unwrap().unwrap();
    assert_eq!(stored.category_id, None);
}

#[test]
fn counts_published_entries_per_category_and_tag() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let tools = create_category(&repo, "Tools");
    let languages = create_category(&repo, "Languages");
    let systems = create_tag(&repo, "systems");
    let web = create_tag(&repo, "web");

    EntrySeed::new("Rust", EntryStatus::Published, alice.id, 1)
        .category(languages.id)
        .tags(vec![systems.id, web.id])
        .insert(&repo);
    EntrySeed::new("Go", EntryStatus::Published, alice.id, 2)
        .category(languages.id)
        .tags(vec![systems.id])
        .insert(&repo);
    EntrySeed::new("Zig", EntryStatus::Draft, alice.id, 3)
        .category(tools.id)
        .tags(vec![web.id])
        .insert(&repo);

    let categories: Vec<(String, usize)> = repo
        .list_categories_with_counts()
        .unwrap()
        .into_iter()
        .map(|c| (c.category.name.into_inner(), c.entry_count))
        .collect();
    assert_eq!(
        categories,
        vec![("Languages".to_string(), 2), ("Tools".to_string(), 0)]
    );

    let tags: Vec<(String, usize)> = repo
        .list_tags_with_counts()
        .unwrap()
        .into_iter()
        .map(|t| (t.tag.name.into_inner(), t.entry_count))
        .collect();
    assert_eq!(
        tags,
        vec![("systems".to_string(), 2), ("web".to_string(), 1)]
    );

    let found = repo.get_tags_by_ids(&[web.id, TagId::new(99).unwrap()]).unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn top_level_comments_newest_first() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");
    let bob = create_user(&repo, "bob");
    let entry = EntrySeed::new("Rust", EntryStatus::Published, alice.id, 1).insert(&repo);

    let comment = |author: UserId, text: &str, when: i64, parent| NewComment {
        entry_id: entry.id,
        author_id: author,
        content: CommentContent::new(text).unwrap(),
        created_at: at(when),
        parent_id: parent,
    };

    let first = repo
        .create_comment(&comment(bob.id, "First", 10, None))
        .expect("should create comment");
    assert_eq!(first.author_name.as_str(), "bob");
    repo.create_comment(&comment(alice.id, "Second", 20, None))
        .expect("should create comment");
    repo.create_comment(&comment(alice.id, "Reply", 30, Some(first.id)))
        .expect("should create reply");

    let listed: Vec<String> = repo
        .list_top_level_comments(entry.id)
        .unwrap()
        .into_iter()
        .map(|c| c.content.into_inner())
        .collect();
    assert_eq!(listed, vec!["Second", "First"]);

    assert_eq!(repo.delete_entry(entry.id, alice.id).unwrap(), 1);
    assert!(repo.list_top_level_comments(entry.id).unwrap().is_empty());
}

#[test]
fn user_lookup_by_id() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let alice = create_user(&repo, "alice");

    let found = repo.get_user_by_id(alice.id).unwrap().unwrap();
    assert_eq!(found.username.as_str(), "alice");
    assert!(repo.get_user_by_id(UserId::new(999).unwrap()).unwrap().is_none());
}
