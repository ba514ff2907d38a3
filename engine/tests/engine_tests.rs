use engine::{Catalog, CatalogEntry, Engine, EngineError, GenreFilter, VectorizerConfig};
use std::io::Write;

fn small_catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new("A", "Action", "Action", "X", "p q"),
        CatalogEntry::new("B", "Action", "Action", "X", "p r"),
        CatalogEntry::new("C", "Drama", "Drama", "Y", "s t"),
    ])
}

fn movie_catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new("Heat", "Action", "Crime", "Michael Mann", "Al Pacino, Robert De Niro, Val Kilmer"),
        CatalogEntry::new("Collateral", "Action", "Crime", "Michael Mann", "Tom Cruise, Jamie Foxx"),
        CatalogEntry::new("The Godfather", "Crime", "Drama", "Francis Ford Coppola", "Marlon Brando, Al Pacino"),
        CatalogEntry::new("Ronin", "Action", "Thriller", "John Frankenheimer", "Robert De Niro, Jean Reno"),
        CatalogEntry::new("Casino", "Crime", "Drama", "Martin Scorsese", "Robert De Niro, Sharon Stone"),
        CatalogEntry::new("Amelie", "Comedy", "Romance", "Jean-Pierre Jeunet", "Audrey Tautou"),
        CatalogEntry::new("Taxi Driver", "Crime", "Drama", "Martin Scorsese", "Robert De Niro, Jodie Foster"),
    ])
}

fn titles(engine: &Engine, query: &str, genre: &str, k: usize) -> Vec<String> {
    engine
        .recommend(query, &GenreFilter::from(genre), k)
        .unwrap()
        .into_iter()
        .map(|r| r.entry.title.clone())
        .collect()
}

#[test]
fn shared_director_and_actor_ranks_first() {
    let engine = Engine::build(small_catalog(), &VectorizerConfig::default()).unwrap();
    let recs = engine.recommend("A", &GenreFilter::All, 2).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].entry.title, "B");
    assert_eq!(recs[1].entry.title, "C");
    assert!(recs[0].score > recs[1].score);
    assert_eq!(recs[1].score, 0.0);
}

#[test]
fn genre_filter_restricts_results() {
    let engine = Engine::build(small_catalog(), &VectorizerConfig::default()).unwrap();
    assert_eq!(titles(&engine, "A", "Drama", 2), vec!["C"]);
    assert!(titles(&engine, "A", "Western", 2).is_empty());
}

#[test]
fn unknown_title_is_reported() {
    let engine = Engine::build(small_catalog(), &VectorizerConfig::default()).unwrap();
    let err = engine.recommend("Unknown Title", &GenreFilter::All, 5).unwrap_err();
    assert!(matches!(err, EngineError::UnknownTitle(_)));
}

#[test]
fn matrix_shape_matches_catalog_and_vocabulary() {
    let engine = Engine::build(movie_catalog(), &VectorizerConfig::default()).unwrap();
    assert_eq!(engine.matrix().rows(), engine.catalog().len());
    assert_eq!(engine.matrix().columns(), engine.vocabulary().len());
    assert!(engine.matrix().columns() <= 5000);
    for row in 0..engine.matrix().rows() {
        assert_eq!(engine.matrix().dense_row(row).unwrap().len(), engine.matrix().columns());
    }

    let capped = VectorizerConfig { max_vocabulary_size: 3, ..Default::default() };
    let engine = Engine::build(movie_catalog(), &capped).unwrap();
    assert_eq!(engine.matrix().columns(), 3);
}

#[test]
fn never_returns_query_and_respects_k_and_genre() {
    let engine = Engine::build(movie_catalog(), &VectorizerConfig::default()).unwrap();
    let genres = engine.catalog().genres();
    for entry in engine.catalog().entries() {
        for k in [0usize, 1, 3, 10] {
            let all = engine.recommend(&entry.title, &GenreFilter::All, k).unwrap();
            assert_eq!(all.len(), k.min(engine.catalog().len() - 1));
            assert!(all.iter().all(|r| r.entry.title != entry.title));
            assert!(all.windows(2).all(|w| w[0].score >= w[1].score));

            for g in &genres {
                let recs = engine.recommend(&entry.title, &GenreFilter::Only(g.clone()), k).unwrap();
                let eligible = engine
                    .catalog()
                    .entries()
                    .iter()
                    .filter(|e| &e.main_genre == g && e.title != entry.title)
                    .count();
                assert_eq!(recs.len(), k.min(eligible));
                assert!(recs.iter().all(|r| &r.entry.main_genre == g && r.entry.title != entry.title));
            }
        }
    }
}

#[test]
fn recommendations_are_deterministic_and_case_insensitive() {
    let engine = Engine::build(movie_catalog(), &VectorizerConfig::default()).unwrap();
    let first = engine.recommend("heat", &GenreFilter::All, 5).unwrap();
    let second = engine.recommend("HEAT", &GenreFilter::All, 5).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].entry.title, "Collateral");
}

#[test]
fn build_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "Movie_Title,main_genre,side_genre,Director,Actors").unwrap();
    writeln!(f, "Heat,Action,Crime,Michael Mann,\"Al Pacino, Robert De Niro\"").unwrap();
    writeln!(f, "Ronin,Action,Thriller,John Frankenheimer,\"Robert De Niro, Jean Reno\"").unwrap();
    writeln!(f, "Broken,Drama,,Someone,Someone").unwrap();
    drop(f);

    let engine = Engine::from_path(&path, &VectorizerConfig::default()).unwrap();
    assert_eq!(engine.catalog().len(), 2);
    assert_eq!(titles(&engine, "heat", "All", 5), vec!["Ronin"]);
}

#[test]
fn empty_catalog_file_fails_to_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    std::fs::write(&path, "Movie_Title,main_genre,side_genre,Director,Actors\nBroken,Drama,,,\n").unwrap();
    let err = Engine::from_path(&path, &VectorizerConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::EmptyCatalog));

    let txt = dir.path().join("movies.txt");
    std::fs::write(&txt, "").unwrap();
    assert!(matches!(
        Engine::from_path(&txt, &VectorizerConfig::default()).unwrap_err(),
        EngineError::UnsupportedFormat(_)
    ));
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(Engine::build(movie_catalog(), &VectorizerConfig::default()).unwrap());
    let expected = titles(&engine, "Casino", "All", 3);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || titles(&engine, "Casino", "All", 3))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn shared_stop_word_in_names_does_not_score() {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("Q", "Comedy", "Sport", "Adam McKay", "Will Ferrell"),
        CatalogEntry::new("R", "Action", "Drama", "Michael Bay", "Will Smith"),
    ]);
    let engine = Engine::build(catalog, &VectorizerConfig::default()).unwrap();
    let recs = engine.recommend("Q", &GenreFilter::All, 1).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].entry.title, "R");
    assert_eq!(recs[0].score, 0.0);
}
