use super::*;

// -- Test helpers --

fn games(names: &[String]) -> Vec<GameRecord> {
    names
        .iter()
        .map(|name| GameRecord::new(name.clone(), format!("tmp/{name}")))
        .collect()
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i:04}")).collect()
}

fn collection(names: &[String]) -> Collection {
    names
        .iter()
        .map(|name| (name.clone(), PathBuf::from(format!("tmp/{name}"))))
        .collect()
}

fn layout(buckets: &[Bucket]) -> Vec<(String, usize)> {
    buckets
        .iter()
        .map(|bucket| (bucket.path.to_string(), bucket.len()))
        .collect()
}

// -- BucketPath --

#[test]
fn test_bucket_path_display_and_overflow() {
    let path = BucketPath::new("0-9").join("1");
    assert_eq!(path.to_string(), "0-9/1");
    assert_eq!(path.overflow(2).to_string(), "0-9/1 (2)");
    assert_eq!(
        path.to_path(Path::new("gamebase")),
        PathBuf::from("gamebase").join("0-9").join("1")
    );
}

// -- cap_bucket --

#[test]
fn test_cap_bucket_300_records() {
    let names = numbered("A", 300);
    let mut shuffled = games(&names);
    shuffled.reverse();

    let buckets = cap_bucket(&BucketPath::new("A"), shuffled, MAX_BUCKET_SIZE);
    assert_eq!(
        layout(&buckets),
        vec![("A".to_string(), 256), ("A (2)".to_string(), 44)]
    );
    assert_eq!(buckets[0].games[0].name(), "A0000");
    assert_eq!(buckets[0].games[255].name(), "A0255");
    assert_eq!(buckets[1].games[0].name(), "A0256");
}

#[test]
fn test_cap_bucket_overflow_index_advances() {
    let games = games(&numbered("(", 800));
    let buckets = cap_bucket(&BucketPath::new("Other"), games, MAX_BUCKET_SIZE);
    assert_eq!(
        layout(&buckets),
        vec![
            ("Other".to_string(), 256),
            ("Other (2)".to_string(), 256),
            ("Other (3)".to_string(), 256),
            ("Other (4)".to_string(), 32),
        ]
    );
}

#[test]
fn test_cap_bucket_exact_multiple_has_no_empty_tail() {
    let buckets = cap_bucket(&BucketPath::new("B"), games(&numbered("B", 256)), MAX_BUCKET_SIZE);
    assert_eq!(layout(&buckets), vec![("B".to_string(), 256)]);
}

#[test]
fn test_cap_bucket_empty() {
    assert!(cap_bucket(&BucketPath::new("C"), Vec::new(), MAX_BUCKET_SIZE).is_empty());
}

// -- pack_groups / split_category --

#[test]
fn test_letter_within_capacity_is_flat() {
    let games = games(&numbered("C", 255));
    let buckets = split_category(Category::Letter('C'), games, MAX_BUCKET_SIZE);
    assert_eq!(layout(&buckets), vec![("C".to_string(), 255)]);
}

#[test]
fn test_letter_over_capacity_packs_sub_categories() {
    let mut names = numbered("AA", 200);
    names.extend(numbered("AB", 100));
    names.extend(numbered("AC", 50));

    let buckets = split_category(Category::Letter('A'), games(&names), MAX_BUCKET_SIZE);
    assert_eq!(
        layout(&buckets),
        vec![("A/A".to_string(), 200), ("A/AB".to_string(), 150)]
    );
    assert_eq!(buckets[1].games[0].name(), "AB0000");
    assert_eq!(buckets[1].games[149].name(), "AC0049");
}

#[test]
fn test_oversized_sub_category_is_capped() {
    let mut names = numbered("AA", 300);
    names.extend(numbered("AB", 10));

    let buckets = split_category(Category::Letter('A'), games(&names), MAX_BUCKET_SIZE);
    assert_eq!(
        layout(&buckets),
        vec![
            ("A/A".to_string(), 256),
            ("A/A (2)".to_string(), 44),
            ("A/AB".to_string(), 10),
        ]
    );
}

#[test]
fn test_digits_split_per_digit() {
    let names = vec!["1GAME".to_string(), "2GAME".to_string(), "1OTHER".to_string()];
    let buckets = split_category(Category::Digits, games(&names), MAX_BUCKET_SIZE);

    let mut expected: Vec<(String, usize)> =
        (0..10).map(|d| (format!("0-9/{d}"), 0)).collect();
    expected[1].1 = 2;
    expected[2].1 = 1;
    assert_eq!(layout(&buckets), expected);
    assert_eq!(buckets[1].names(), vec!["1GAME", "1OTHER"]);
    assert_eq!(buckets[2].names(), vec!["2GAME"]);
    assert!(buckets[0].is_empty());
}

#[test]
fn test_digits_overflow_within_one_digit() {
    let buckets = split_category(Category::Digits, games(&numbered("7", 260)), MAX_BUCKET_SIZE);
    let layout = layout(&buckets);
    assert_eq!(layout.len(), 11);
    assert_eq!(layout[7], ("0-9/7".to_string(), 256));
    assert_eq!(layout[8], ("0-9/7 (2)".to_string(), 4));
    assert_eq!(layout[9], ("0-9/8".to_string(), 0));
}

#[test]
fn test_other_is_one_capped_bucket() {
    let names = vec!["(B)".to_string(), "!A".to_string()];
    let buckets = split_category(Category::Other, games(&names), MAX_BUCKET_SIZE);
    assert_eq!(layout(&buckets), vec![("Other".to_string(), 2)]);
    assert_eq!(buckets[0].names(), vec!["!A", "(B)"]);
}

#[test]
fn test_small_capacity() {
    let names = vec![
        "BA1".to_string(),
        "BA2".to_string(),
        "BB1".to_string(),
        "BC1".to_string(),
        "BC2".to_string(),
    ];
    let buckets = split_category(Category::Letter('B'), games(&names), 2);
    assert_eq!(
        layout(&buckets),
        vec![
            ("B/B".to_string(), 2),
            ("B/BB".to_string(), 1),
            ("B/BC".to_string(), 2),
        ]
    );
}

// -- plan_buckets --

#[test]
fn test_plan_buckets_layout() {
    let mut names = numbered("A", 300);
    names.extend(["1942".to_string(), "ELITE".to_string(), "NO_NAME".to_string()]);

    let buckets = plan_buckets(collection(&names), MAX_BUCKET_SIZE);
    assert_eq!(
        layout(&buckets),
        vec![
            ("0-9/0".to_string(), 0),
            ("0-9/1".to_string(), 1),
            ("0-9/2".to_string(), 0),
            ("0-9/3".to_string(), 0),
            ("0-9/4".to_string(), 0),
            ("0-9/5".to_string(), 0),
            ("0-9/6".to_string(), 0),
            ("0-9/7".to_string(), 0),
            ("0-9/8".to_string(), 0),
            ("0-9/9".to_string(), 0),
            ("A/A".to_string(), 256),
            ("A/A (2)".to_string(), 44),
            ("E".to_string(), 1),
            ("N".to_string(), 1),
        ]
    );
}

#[test]
fn test_plan_buckets_places_every_game_once() {
    let mut names = numbered("A", 700);
    names.extend(numbered("S", 40));
    names.extend(numbered("3", 260));
    names.extend(numbered("[", 300));
    let source = collection(&names);
    let total = source.len();

    let buckets = plan_buckets(source, MAX_BUCKET_SIZE);

    let mut placed: Vec<&str> = buckets.iter().flat_map(Bucket::names).collect();
    assert_eq!(placed.len(), total);
    placed.sort();
    placed.dedup();
    assert_eq!(placed.len(), total);

    for bucket in &buckets {
        if bucket.path.segments()[0] != "0-9" {
            assert!(!bucket.is_empty(), "{}", bucket.path);
        }
        assert!(bucket.len() <= MAX_BUCKET_SIZE + 1, "{}", bucket.path);
        let names = bucket.names();
        assert!(names.windows(2).all(|w| w[0] < w[1]), "{}", bucket.path);
    }
}
