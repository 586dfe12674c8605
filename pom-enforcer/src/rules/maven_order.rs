//! Built-in element order for Maven project files.
//!
//! Each entry maps an element name to the order of its children wherever
//! that name occurs. Names appear once; elements such as `configuration` and
//! `properties` have free-form content and no entry.

pub(super) const MAVEN_ORDER: &[(&str, &[&str])] = &[
    (
        "project",
        &[
            "modelVersion",
            "parent",
            "groupId",
            "artifactId",
            "version",
            "packaging",
            "name",
            "description",
            "url",
            "inceptionYear",
            "organization",
            "licenses",
            "developers",
            "contributors",
            "mailingLists",
            "prerequisites",
            "modules",
            "scm",
            "issueManagement",
            "ciManagement",
            "distributionManagement",
            "properties",
            "dependencyManagement",
            "dependencies",
            "repositories",
            "pluginRepositories",
            "build",
            "reporting",
            "profiles",
        ],
    ),
    ("parent", &["groupId", "artifactId", "version", "relativePath"]),
    ("organization", &["name", "url"]),
    ("licenses", &["license"]),
    ("license", &["name", "url", "distribution", "comments"]),
    ("developers", &["developer"]),
    (
        "developer",
        &[
            "id",
            "name",
            "email",
            "url",
            "organization",
            "organizationUrl",
            "roles",
            "timezone",
            "properties",
        ],
    ),
    ("roles", &["role"]),
    ("contributors", &["contributor"]),
    (
        "contributor",
        &[
            "name",
            "email",
            "url",
            "organization",
            "organizationUrl",
            "roles",
            "timezone",
            "properties",
        ],
    ),
    ("mailingLists", &["mailingList"]),
    (
        "mailingList",
        &["name", "subscribe", "unsubscribe", "post", "archive", "otherArchives"],
    ),
    ("otherArchives", &["otherArchive"]),
    ("prerequisites", &["maven"]),
    ("modules", &["module"]),
    ("scm", &["connection", "developerConnection", "tag", "url"]),
    ("issueManagement", &["system", "url"]),
    ("ciManagement", &["system", "url", "notifiers"]),
    ("notifiers", &["notifier"]),
    (
        "notifier",
        &[
            "type",
            "sendOnError",
            "sendOnFailure",
            "sendOnSuccess",
            "sendOnWarning",
            "address",
            "configuration",
        ],
    ),
    (
        "distributionManagement",
        &[
            "repository",
            "snapshotRepository",
            "site",
            "downloadUrl",
            "relocation",
            "status",
        ],
    ),
    (
        "repository",
        &["uniqueVersion", "releases", "snapshots", "id", "name", "url", "layout"],
    ),
    ("releases", &["enabled", "updatePolicy", "checksumPolicy"]),
    ("snapshots", &["enabled", "updatePolicy", "checksumPolicy"]),
    (
        "snapshotRepository",
        &["uniqueVersion", "releases", "snapshots", "id", "name", "url", "layout"],
    ),
    ("site", &["id", "name", "url"]),
    ("relocation", &["groupId", "artifactId", "version", "message"]),
    ("dependencyManagement", &["dependencies"]),
    ("dependencies", &["dependency"]),
    (
        "dependency",
        &[
            "groupId",
            "artifactId",
            "version",
            "type",
            "classifier",
            "scope",
            "systemPath",
            "exclusions",
            "optional",
        ],
    ),
    ("exclusions", &["exclusion"]),
    ("exclusion", &["groupId", "artifactId"]),
    ("repositories", &["repository"]),
    ("pluginRepositories", &["pluginRepository"]),
    (
        "pluginRepository",
        &["releases", "snapshots", "id", "name", "url", "layout"],
    ),
    (
        "build",
        &[
            "defaultGoal",
            "directory",
            "finalName",
            "sourceDirectory",
            "scriptSourceDirectory",
            "testSourceDirectory",
            "outputDirectory",
            "testOutputDirectory",
            "extensions",
            "resources",
            "testResources",
            "filters",
            "pluginManagement",
            "plugins",
        ],
    ),
    ("extensions", &["extension"]),
    ("extension", &["groupId", "artifactId", "version"]),
    ("resources", &["resource"]),
    (
        "resource",
        &["targetPath", "filtering", "directory", "includes", "excludes"],
    ),
    ("includes", &["include"]),
    ("excludes", &["exclude"]),
    ("testResources", &["testResource"]),
    (
        "testResource",
        &["targetPath", "filtering", "directory", "includes", "excludes"],
    ),
    ("filters", &["filter"]),
    ("pluginManagement", &["plugins"]),
    ("plugins", &["plugin"]),
    (
        "plugin",
        &[
            "groupId",
            "artifactId",
            "version",
            "extensions",
            "executions",
            "dependencies",
            "inherited",
            "configuration",
        ],
    ),
    ("executions", &["execution"]),
    (
        "execution",
        &["id", "phase", "goals", "inherited", "configuration"],
    ),
    ("goals", &["goal"]),
    ("reporting", &["excludeDefaults", "outputDirectory", "plugins"]),
    ("profiles", &["profile"]),
    (
        "profile",
        &[
            "id",
            "activation",
            "build",
            "modules",
            "distributionManagement",
            "properties",
            "dependencyManagement",
            "dependencies",
            "repositories",
            "pluginRepositories",
            "reporting",
        ],
    ),
    (
        "activation",
        &["activeByDefault", "jdk", "os", "property", "file"],
    ),
    ("os", &["name", "family", "arch", "version"]),
    ("property", &["name", "value"]),
    ("file", &["missing", "exists"]),
];
