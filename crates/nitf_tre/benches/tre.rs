use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_registry() -> nitf_tre::SchemaRegistry {
    let file = std::fs::File::open(format!(
        "{}/resources/schemas.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    nitf_tre::SchemaRegistry::from_json_reader(file).unwrap()
}

fn get_input(name: &str) -> Vec<u8> {
    std::fs::read(format!("{}/resources/{name}", env!("CARGO_MANIFEST_DIR"))).unwrap()
}

pub mod read {
    use divan::Bencher;
    use nitf_tre::{TreParser, TreSource};

    #[divan::bench(args = ["camsda.tre", "planea.tre", "testaa.tre"])]
    fn parse_area(bencher: Bencher, name: &str) {
        let registry = super::get_registry();
        let parser = TreParser::new(&registry);

        bencher
            .with_inputs(|| super::get_input(name))
            .bench_refs(|data| {
                divan::black_box(
                    parser
                        .parse_bytes(data, TreSource::ImageExtendedSubheaderData)
                        .unwrap(),
                );
            });
    }
}

pub mod write {
    use divan::Bencher;
    use nitf_tre::{TreParser, TreSerializer, TreSource};

    #[divan::bench(args = ["camsda.tre", "planea.tre", "testaa.tre"])]
    fn collection_bytes(bencher: Bencher, name: &str) {
        let registry = super::get_registry();
        let source = TreSource::ImageExtendedSubheaderData;
        let tres = TreParser::new(&registry)
            .parse_bytes(&super::get_input(name), source)
            .unwrap();
        let serializer = TreSerializer::new(&registry);

        bencher.bench_local(move || {
            divan::black_box(serializer.collection_bytes(&tres, source).unwrap());
        });
    }
}
