use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use nested_i18n_runtime::{
    Composite, Entry, EntryStore, FALLBACK, FileResources, Formatter, FormatterChain, I18nError,
    Lang, Leaf, Message, ResourceError, ResourceProvider,
};

fn en() -> Lang {
    Lang::new("en", "English")
}

fn ja() -> Lang {
    Lang::new("ja", "Japanese")
}

fn write_lang(root: &std::path::Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
    fs::write(path, contents).expect("write");
}

fn disk_store(root: &std::path::Path) -> EntryStore {
    let providers: Vec<Box<dyn ResourceProvider>> = vec![
        Box::new(FileResources::assets(root.join("bundle"), "org.example", "demo")),
        Box::new(FileResources::data_folder(root.join("data"))),
    ];
    EntryStore::new(providers)
}

#[test]
fn loads_from_disk_and_resolves_nested_messages() {
    let dir = tempfile::tempdir().expect("dir");
    write_lang(
        dir.path(),
        "bundle/assets/org/example/demo/langs/en.lang",
        "app = Demo\ntitle = <$app>: <args[0]>\nitem = - <args[0]>\n",
    );
    write_lang(dir.path(), "data/langs/en.lang", "app = Demo Pro\n");

    let store = Arc::new(disk_store(dir.path()));
    store.load(&en()).expect("load");
    let formatter = Formatter::with_fallback(Arc::clone(&store), en());

    let listing: Message = Composite::of([
        Leaf::new("item").arg("apples"),
        Leaf::new("item").arg("pears"),
    ])
    .with_separator("\n")
    .into();
    let title: Message = Leaf::new("title").arg(listing).into();

    let output = title.build_required(&formatter, &[ja(), FALLBACK]).expect("title");
    assert_eq!(output, "Demo Pro: - apples\n- pears");
}

#[test]
fn reload_picks_up_override_changes() {
    let dir = tempfile::tempdir().expect("dir");
    write_lang(dir.path(), "data/langs/en.lang", "greeting = Hello");
    let store = Arc::new(disk_store(dir.path()));
    store.load(&en()).expect("load");
    let formatter = Formatter::new(Arc::clone(&store));

    store.reload().expect("reload unchanged");
    assert_eq!(formatter.resolve("greeting", &[en()], &[]).as_deref(), Some("Hello"));

    write_lang(dir.path(), "data/langs/en.lang", "greeting = Howdy");
    store.reload_lang(&en()).expect("reload");
    assert_eq!(formatter.resolve("greeting", &[en()], &[]).as_deref(), Some("Howdy"));
}

#[test]
fn invalid_override_keys_keep_previous_entry() {
    let dir = tempfile::tempdir().expect("dir");
    write_lang(dir.path(), "data/langs/en.lang", "greeting = Hello");
    let store = disk_store(dir.path());
    store.load(&en()).expect("load");

    write_lang(dir.path(), "data/langs/en.lang", "Greeting = Hello");
    let err = store.reload().expect_err("invalid key");
    assert!(matches!(err, I18nError::IllegalKey { ref keys, .. } if keys == &["Greeting"]));
    let entry = store.get(&en()).expect("entry");
    assert_eq!(entry.get("greeting"), Some("Hello"));
}

#[test]
fn chain_prefers_plugin_bundle_then_host() {
    let plugin_dir = tempfile::tempdir().expect("dir");
    let host_dir = tempfile::tempdir().expect("dir");
    write_lang(plugin_dir.path(), "data/langs/en.lang", "pluginName = Sprockets");
    write_lang(host_dir.path(), "data/langs/en.lang", "pluginName = Unknown\nhelp = Type /help");

    let plugin = Arc::new(disk_store(plugin_dir.path()));
    plugin.load(&en()).expect("plugin");
    let host = Arc::new(disk_store(host_dir.path()));
    host.load(&en()).expect("host");

    let chain = FormatterChain::new(vec![
        Formatter::with_fallback(plugin, en()),
        Formatter::with_fallback(host, en()),
    ]);
    let name: Message = Leaf::new("pluginName").into();
    let help: Message = Leaf::new("help").into();
    assert_eq!(chain.build_by_fallback(&name).as_deref(), Some("Sprockets"));
    assert_eq!(chain.build_with_fallback(&help, &[ja()]).as_deref(), Some("Type /help"));
    chain.reload().expect("reload");
}

const OLD_GREETING: &str = "Hello from the old bundle";
const NEW_GREETING: &str = "Hello from the new bundle";

/// Serves the old and new greeting on alternate fetches.
struct AlternatingResources {
    fetches: AtomicUsize,
}

impl ResourceProvider for AlternatingResources {
    fn location(&self, lang: &Lang) -> String {
        format!("alternating:{}", lang.id())
    }

    fn fetch(&self, _lang: &Lang) -> Result<Vec<u8>, ResourceError> {
        let greeting = if self.fetches.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            OLD_GREETING
        } else {
            NEW_GREETING
        };
        Ok(format!("greeting = {greeting}\n").into_bytes())
    }
}

#[test]
fn readers_see_whole_templates_while_entries_are_swapped() {
    let providers: Vec<Box<dyn ResourceProvider>> = vec![Box::new(AlternatingResources {
        fetches: AtomicUsize::new(0),
    })];
    let store = Arc::new(EntryStore::new(providers));
    store.load(&en()).expect("load");

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0..200 {
                if round % 2 == 0 {
                    store.reload().expect("reload");
                } else {
                    let mut entry = Entry::new(en());
                    entry.insert("greeting", OLD_GREETING);
                    store.put(entry).expect("put");
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let formatter = Formatter::with_fallback(Arc::clone(&store), en());
            thread::spawn(move || {
                for _ in 0..500 {
                    let greeting = formatter
                        .resolve_required("greeting", &[en()], &[])
                        .expect("greeting");
                    assert!(
                        greeting == OLD_GREETING || greeting == NEW_GREETING,
                        "torn greeting: {greeting}"
                    );
                }
            })
        })
        .collect();

    writer.join().expect("writer");
    for reader in readers {
        reader.join().expect("reader");
    }
}
