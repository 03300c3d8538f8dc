use chrono::NaiveDate;
use intern_core::{
    render_csv, write_export, ContractRenewal, Department, EntryDateOrder, InternFields,
    InternListQuery, InternService, KvInternRepository, MemoryKvStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn intern(last_name: &str, entry_date: Option<NaiveDate>) -> InternFields {
    let mut fields = InternFields::new(last_name, "Test", date(2000, 5, 5), Department::Informatique);
    fields.entry_date = entry_date;
    fields
}

#[test]
fn list_page_searches_sorts_and_paginates() {
    let store = MemoryKvStore::new();
    let service = InternService::new(KvInternRepository::new(&store));
    service.create_intern(intern("Kone", Some(date(2025, 3, 1)))).unwrap();
    service.create_intern(intern("Konate", Some(date(2025, 1, 1)))).unwrap();
    service.create_intern(intern("Yao", None)).unwrap();
    service.create_intern(intern("Bakayoko", Some(date(2025, 2, 1)))).unwrap();

    let searched = service
        .list_page(&InternListQuery {
            search: Some("KON".to_string()),
            ..InternListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = searched.items.iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, ["Kone", "Konate"]);
    assert_eq!(searched.total, 2);
    assert!(!searched.has_next);

    let ascending = service
        .list_page(&InternListQuery {
            sort: Some(EntryDateOrder::Ascending),
            ..InternListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = ascending.items.iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, ["Yao", "Konate", "Bakayoko", "Kone"]);

    let descending_page_two = service
        .list_page(&InternListQuery {
            sort: Some(EntryDateOrder::Descending),
            page: 2,
            page_size: Some(3),
            ..InternListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = descending_page_two
        .items
        .iter()
        .map(|r| r.last_name.as_str())
        .collect();
    assert_eq!(names, ["Yao"]);
    assert_eq!(descending_page_two.page, 2);
    assert_eq!(descending_page_two.total, 4);
    assert!(!descending_page_two.has_next);
}

#[test]
fn list_page_finds_records_by_id_fragment() {
    let store = MemoryKvStore::new();
    let service = InternService::new(KvInternRepository::new(&store));
    let target = service.create_intern(intern("Kone", None)).unwrap();
    service.create_intern(intern("Yao", None)).unwrap();

    let page = service
        .list_page(&InternListQuery {
            search: Some(target.id[..8].to_string()),
            ..InternListQuery::default()
        })
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, target.id);
}

#[test]
fn list_page_defaults_to_ten_items_with_next_flag() {
    let store = MemoryKvStore::new();
    let service = InternService::new(KvInternRepository::new(&store));
    for idx in 0..12 {
        service
            .create_intern(intern(&format!("Name{idx}"), None))
            .unwrap();
    }

    let first = service.list_page(&InternListQuery::default()).unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.page_size, 10);
    assert_eq!(first.items.len(), 10);
    assert!(first.has_next);

    let second = service
        .list_page(&InternListQuery {
            page: 2,
            ..InternListQuery::default()
        })
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next);
}

#[test]
fn csv_export_uses_fixed_column_order_without_header() {
    let store = MemoryKvStore::new();
    let service = InternService::new(KvInternRepository::new(&store));

    let mut first = intern("Doe", Some(date(2025, 1, 1)));
    first.email = Some("jane@example.com".to_string());
    first.phone = Some("0701020304".to_string());
    first.end_date = Some(date(2025, 6, 30));
    first.social_security_number = Some("CNPS-9".to_string());
    first.contract_renewal = Some(ContractRenewal::No);
    service.create_intern(first).unwrap();
    service.create_intern(intern("Yao", None)).unwrap();

    let csv = service.export_csv().unwrap();
    assert_eq!(
        csv,
        "Doe,Test,INFORMATIQUE,jane@example.com,0701020304,2025-01-01,2025-06-30,CNPS-9,No\n\
         Yao,Test,INFORMATIQUE,,,,,,"
    );
    assert_eq!(render_csv(&[]), "");
}

#[test]
fn table_export_renders_header_and_current_view_rows() {
    let store = MemoryKvStore::new();
    let service = InternService::new(KvInternRepository::new(&store));
    service.create_intern(intern("Doe & Sons", Some(date(2025, 1, 1)))).unwrap();
    service.create_intern(intern("Yao", None)).unwrap();

    let html = service
        .export_table(&InternListQuery {
            search: Some("doe".to_string()),
            ..InternListQuery::default()
        })
        .unwrap();

    assert!(html.contains(
        "<tr><th>Last name</th><th>First names</th><th>Department</th>\
         <th>Entry date</th><th>Email</th><th>Phone</th></tr>"
    ));
    assert!(html.contains("<td>Doe &amp; Sons</td>"));
    assert!(html.contains("<td>2025-01-01</td>"));
    assert!(!html.contains("Yao"));
}

#[test]
fn write_export_persists_rendered_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("interns.csv");

    write_export(&path, "a,b,c").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b,c");

    let missing_dir = dir.path().join("missing").join("interns.csv");
    assert!(write_export(&missing_dir, "x").is_err());
}
