#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Generate the Go mapping file",
        commands: &[
            "fieldmap --pattern './graph/model/*.go'",
            "fieldmap --files ./db/sqlc/models.go,./graph/model/auth.go",
            "fieldmap --pattern './graph/model/*.go' --output ./internal/mapping/fields.go",
        ],
    },
    ExampleGroup {
        title: "Other formats and tags",
        commands: &[
            "fieldmap --dir ./db --output ./src/generated/fields.rs",
            "fieldmap --dir ./db --tag db --strip-options --format json --output fields.json",
        ],
    },
    ExampleGroup {
        title: "Inspect without writing",
        commands: &[
            "fieldmap --dir ./graph --print",
            "fieldmap --config ./tools/fieldmap.toml --print --output-format json",
        ],
    },
];
