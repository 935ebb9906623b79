//! Detailed help text for each command. `{plugin_name}` is replaced with the
//! plugin's display name when rendered.

pub const ADD_URL: &str = "
add-url adds a new url checker to the given instance. Usage:

    add-url <service-name> <instance-name> <url> [expected_string] [comment]

expected_string is optional: the string the healthcheck expects to find in
the body of the response. Example:

    tsuru {plugin_name} add-url hcaas mysite http://mysite.com/hc WORKING

comment is optional: what to do when the trigger fires. Example:

    tsuru {plugin_name} add-url hcaas mysite http://mysite.com/hc '' 'restart the app'
";

pub const REMOVE_URL: &str = "
remove-url removes the given url checker from the instance. Usage:

    remove-url <service-name> <instance-name> <url>

Example:

    tsuru {plugin_name} remove-url hcaas mysite http://mysite.com/hc
";

pub const LIST_URLS: &str = "
list-urls lists all urls checked for an instance. Usage:

    list-urls <service-name> <instance-name>

Example:

    tsuru {plugin_name} list-urls hcaas mysite
";

pub const ADD_WATCHER: &str = "
add-watcher adds a watcher to the given instance. A watcher is an email
address that receives the notifications of this instance. Usage:

    add-watcher <service-name> <instance-name> <email> [password]

password is optional and only used when a new user has to be created in the
monitoring backend. Example:

    tsuru {plugin_name} add-watcher hcaas mysite mysite+monit@mycompany.com
";

pub const REMOVE_WATCHER: &str = "
remove-watcher removes the given watcher from the instance. Usage:

    remove-watcher <service-name> <instance-name> <email>

Example:

    tsuru {plugin_name} remove-watcher hcaas mysite mysite+monit@mycompany.com
";

pub const LIST_WATCHERS: &str = "
list-watchers lists all watchers of an instance. Usage:

    list-watchers <service-name> <instance-name>

Example:

    tsuru {plugin_name} list-watchers hcaas mysite
";

pub const LIST_SERVICE_GROUPS: &str = "
list-service-groups lists the host groups available in the service. Usage:

    list-service-groups <service-name> <instance-name> [keyword]

keyword is optional: a prefix used to filter the groups.

Examples:

    tsuru {plugin_name} list-service-groups hcaas mysite

    tsuru {plugin_name} list-service-groups hcaas mysite projects
";

pub const ADD_GROUP: &str = "
add-group attaches a host group to the given instance. The host group
receives the notifications of this instance. Usage:

    add-group <service-name> <instance-name> <hostgroup>

Example:

    tsuru {plugin_name} add-group hcaas mysite MyHostGroup
";

pub const REMOVE_GROUP: &str = "
remove-group detaches the given host group from the instance. Usage:

    remove-group <service-name> <instance-name> <hostgroup>

Example:

    tsuru {plugin_name} remove-group hcaas mysite MyHostGroup
";

pub const LIST_GROUPS: &str = "
list-groups lists the host groups attached to an instance. Usage:

    list-groups <service-name> <instance-name>

Example:

    tsuru {plugin_name} list-groups hcaas mysite
";

pub const HELP: &str = "
help shows the help of the given command. Usage:

    help [command-name]

Example:

    tsuru {plugin_name} help add-url

When command-name is omitted every available command is listed.
";

/// Fills in the plugin name and drops trailing whitespace.
pub fn render(template: &str, plugin_name: &str) -> String {
    template
        .replace("{plugin_name}", plugin_name)
        .trim_end()
        .to_string()
}
